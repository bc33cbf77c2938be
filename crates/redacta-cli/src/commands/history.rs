use clap::Subcommand;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved corrections, most recent first
    List {
        /// Raw JSON output
        #[arg(long)]
        json: bool,
    },
    /// Print one correction in full
    Show { id: String },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let (app, _config) = super::open_app()?;

    match action {
        HistoryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(app.history())?);
                return Ok(());
            }
            if app.history().is_empty() {
                println!("Nenhuma redação corrigida ainda.");
                return Ok(());
            }
            for saved in app.history() {
                println!(
                    "{}  {}  {:>4}  {}",
                    saved.id,
                    saved.date.format("%Y-%m-%d"),
                    saved.score,
                    saved.title
                );
            }
        }
        HistoryAction::Show { id } => {
            let saved = app
                .history()
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| format!("correção '{id}' não encontrada"))?;
            println!("{}", serde_json::to_string_pretty(saved)?);
        }
    }
    Ok(())
}
