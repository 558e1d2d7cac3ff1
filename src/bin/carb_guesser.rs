use clap::{ArgGroup, Parser};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use carbscope::handlers::AnalysisHandler;
use carbscope::services::{groq, GroqService};

/// Estimate carbohydrates in food images from the command line.
#[derive(Debug, Parser)]
#[command(name = "carb_guesser", about = "Estimate carbohydrates in food images")]
#[command(group(ArgGroup::new("image").required(true).multiple(false)))]
struct Args {
    /// URL of the food image to analyse
    #[arg(long, group = "image")]
    image_url: Option<String>,

    /// Local jpeg/png file to analyse instead of a URL
    #[arg(long, group = "image")]
    file: Option<String>,

    /// Model identifier
    #[arg(long, env = "GROQ_MODEL", default_value = groq::DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    dotenv().ok();

    let args = Args::parse();

    let api_key = env::var("GROQ_API_KEY").unwrap_or_default();
    if api_key.trim().is_empty() {
        eprintln!("Error: GROQ_API_KEY environment variable not set");
        eprintln!("Set it using: export GROQ_API_KEY='your_api_key'");
        std::process::exit(1);
    }

    let handler = AnalysisHandler::new(Arc::new(GroqService::new(api_key, args.model)));

    let result = match (&args.image_url, &args.file) {
        (Some(url), _) => handler.analyze_url(url).await,
        (_, Some(path)) => handler.analyze_file(path).await,
        // clap's arg group guarantees one of the two is present
        (None, None) => unreachable!(),
    };

    match result {
        Ok(analysis) => {
            println!("\n====== CARBOHYDRATE ESTIMATION RESULTS ======\n");
            println!("{}", analysis.raw);
            println!("\n============================================\n");
            match analysis.total_g {
                Some(total) => println!("Estimated total: {} g carbohydrates", total),
                None => println!("Could not extract a total from the analysis."),
            }
        }
        Err(err) => {
            eprintln!("Error during carbohydrate estimation: {}", err);
            std::process::exit(1);
        }
    }
}
