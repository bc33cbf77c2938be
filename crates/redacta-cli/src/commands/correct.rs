use std::io::Read;
use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct CorrectArgs {
    /// Essay file; reads stdin when omitted
    pub file: Option<PathBuf>,
    /// Essay title
    #[arg(long)]
    pub title: Option<String>,
    /// Stricter grader persona
    #[arg(long)]
    pub rigorous: bool,
}

pub async fn run(args: CorrectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let (mut app, config) = super::open_app()?;
    let gateway = super::gateway(&config)?;
    let saved = app
        .submit_essay(
            &gateway,
            args.title.as_deref().unwrap_or(""),
            &text,
            args.rigorous,
            config.essay.min_length,
        )
        .await?;

    println!("Pontuação final: {}", saved.score);
    if args.rigorous {
        println!("(modo rigoroso ativo)");
    }
    println!();
    for (label, competency) in saved.correction.competencies.iter() {
        println!("{label}: {} | {}", competency.score, competency.feedback);
    }
    println!();
    println!("Repertório: {}", saved.correction.repertory_analysis.quality);
    println!("{}", saved.correction.repertory_analysis.connection_feedback);
    println!();
    println!("{}", saved.correction.general_feedback);
    for suggestion in &saved.correction.suggestions {
        println!("  - {suggestion}");
    }
    Ok(())
}
