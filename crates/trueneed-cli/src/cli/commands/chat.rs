//! Advisor command handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;
use trueneed_core::advisor::{
    Advisor, Message, Product, Role, featured_products, sample_conversation,
};
use trueneed_shell::headline::WORDS;
use trueneed_shell::{ChatView, Headline};

use crate::cli::App;

const QUIT: &str = ":q";
const NEW_CHAT: &str = ":new";

pub async fn run(app: &App, sample: bool) -> Result<()> {
    let advisor = Advisor::from_config(&app.config);
    let mut chat = if sample {
        ChatView::with_messages(sample_conversation())
    } else {
        ChatView::new()
    };
    for message in chat.messages() {
        print_message(message);
    }
    let interactive = io::stdin().is_terminal();

    if interactive {
        println!(
            "Ask about anything you are thinking of buying. `{NEW_CHAT}` starts over, `{QUIT}` quits."
        );
    }

    let mut input = String::new();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        input.clear();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            QUIT => {
                eprintln!("Goodbye!");
                break;
            }
            NEW_CHAT => {
                chat.new_chat();
                println!("Started a new chat.");
            }
            text => {
                if chat.submit(text).is_none() {
                    continue;
                }
                let reply = advisor.send_message(text).await;
                print_message(&reply);
                chat.receive(reply);
            }
        }
    }

    tracing::debug!(archived = chat.conversations().len(), "chat ended");
    Ok(())
}

pub async fn analyze(app: &App, url: &str) -> Result<()> {
    let advisor = Advisor::from_config(&app.config);
    let analysis = advisor.analyze_product(url).await;

    println!("{} ({})", analysis.name, analysis.price);
    println!("  {}", analysis.url);
    println!("  {}", analysis.analysis);
    Ok(())
}

pub fn products() {
    for product in featured_products() {
        print_product(&product);
    }
}

/// Prints the headline, or plays one full cycle of the typing animation.
pub async fn banner(animate: bool) -> Result<()> {
    let mut headline = Headline::new();
    if !animate {
        for line in headline.lines() {
            println!("{line}");
        }
        return Ok(());
    }

    // one delete/retype/hold pass per word
    let mut stdout = io::stdout();
    for _ in 0..WORDS.len() {
        let start = headline.word_index();
        while headline.word_index() == start {
            let [first, second] = headline.lines();
            write!(stdout, "\r\x1b[2K{first}  {second}")?;
            stdout.flush()?;
            let delay = headline.tick();
            tokio::time::sleep(delay).await;
        }
    }
    let [first, second] = headline.lines();
    writeln!(stdout, "\r\x1b[2K{first}  {second}")?;
    Ok(())
}

fn print_message(message: &Message) {
    match message.role {
        Role::User => println!("> {}", message.text),
        Role::Assistant => {
            println!("{}", message.text);
            for product in &message.products {
                print_product(product);
            }
        }
    }
}

fn print_product(product: &Product) {
    println!();
    println!("{} - {} [{}]", product.name, product.price, product.verdict);
    println!("  {}", product.specs);
    let r = product.ratings;
    println!(
        "  Performance {}  Battery {}  Build {}  Value {}",
        r.performance, r.battery, r.build, r.value
    );
    for pro in product.pros {
        println!("  + {pro}");
    }
    for con in product.cons {
        println!("  - {con}");
    }
}
