//! Runs LLM prompt enhancement over a few dreams and prints the results.
//!
//! Usage: `enhance-prompt [--style inspirational|peak-moment] [dream...]`

use dreamizer::{logger, EnhancementStyle, OpenRouterConfig, PromptEnhancer, TextClient};
use std::time::Duration;

const EXAMPLE_DREAMS: [&str; 4] = [
    "Flying through the clouds",
    "Winning an Olympic medal",
    "Performing on a world stage",
    "Discovering a new planet",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::from_filename(".env.local").or_else(|_| dotenv::dotenv());
    logger::init_with_config(logger::LoggerConfig::from_env())?;

    let mut style = EnhancementStyle::PeakMoment;
    let mut dreams = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--style" {
            let value = args.next().unwrap_or_default();
            style = EnhancementStyle::parse(&value)
                .ok_or_else(|| format!("Unknown style: {}", value))?;
        } else {
            dreams.push(arg);
        }
    }
    if dreams.is_empty() {
        dreams = EXAMPLE_DREAMS.iter().map(|d| d.to_string()).collect();
    }

    let client = TextClient::new(OpenRouterConfig::from_env())?.with_style(style);
    log::info!("🧪 Testing enhanced prompt generation ({:?})", client.style());

    let total = dreams.len();
    for (i, dream) in dreams.iter().enumerate() {
        println!("{}", "=".repeat(80));
        println!("📝 Test {}/{}", i + 1, total);
        println!("Dream: \"{}\"", dream);
        println!("{}", "-".repeat(80));

        match client.enhance(dream).await {
            Ok(prompt) => {
                println!("✨ Enhanced Prompt:\n{}\n", prompt);
                println!("📊 Length: {} characters", prompt.chars().count());
            }
            Err(e) => log::error!("Failed to generate prompt: {}", e),
        }

        if i + 1 < total {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }

    println!("{}", "=".repeat(80));
    log::info!("✅ Testing complete!");
    Ok(())
}
