use clap::Subcommand;
use redacta_core::LaunchScreen;

#[derive(Subcommand)]
pub enum OnboardingAction {
    /// Which screen a fresh launch would land on
    Status,
    /// Record acceptance of the terms of use
    AcceptTerms,
    /// Record that the study guide was seen
    GuideSeen,
}

pub fn run(action: OnboardingAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut app, _config) = super::open_app()?;

    match action {
        OnboardingAction::Status => {
            let screen = match app.launch_screen() {
                LaunchScreen::Onboarding => "onboarding (termos pendentes)",
                LaunchScreen::Guide => "guia de estudo",
                LaunchScreen::Home => "início",
            };
            println!("{screen}");
        }
        OnboardingAction::AcceptTerms => {
            app.accept_terms();
            println!("Termos aceitos.");
        }
        OnboardingAction::GuideSeen => {
            app.mark_guide_seen();
            println!("Guia marcado como visto.");
        }
    }
    Ok(())
}
