pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (_app, config) = super::open_app()?;
    let gateway = super::gateway(&config)?;
    let themes = redacta_core::TutorGateway::probable_themes(&gateway).await?;

    for theme in themes {
        println!("## {}", theme.title);
        println!("{}", theme.description);
        println!("Por quê: {}", theme.reasons);
        for source in &theme.sources {
            println!("  - {} <{}>", source.title, source.uri);
        }
        println!();
    }
    Ok(())
}
