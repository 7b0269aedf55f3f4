use std::path::PathBuf;

use clap::Parser;
use timed_quiz::Quiz;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from
    #[arg(short, long)]
    questions: PathBuf,

    /// Directory holding the persisted session
    #[arg(long, default_value = ".timed-quiz")]
    data_dir: PathBuf,

    /// WebSocket URL of the grading service
    #[arg(long, default_value = "ws://127.0.0.1:8712")]
    grader: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let quiz = match Quiz::new(&args.questions, &args.data_dir, &args.grader) {
        Ok(quiz) => quiz,
        Err(e) => {
            eprintln!("Error starting quiz: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = quiz.run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
