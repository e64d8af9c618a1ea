use clap::Parser;
use dotenv::dotenv;
use std::error::Error;
use vr_concierge::agent::ChatAgent;
use vr_concierge::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Stateless one-shot adapter: same responder, no server.
    if let Some(message) = args.one_shot.clone() {
        if message.trim().is_empty() {
            return Err("El mensaje es requerido".into());
        }
        let agent = ChatAgent::new(&args)?;
        let reply = agent.respond(&message, &[]).await;
        println!("{}", serde_json::to_string(&reply)?);
        return Ok(());
    }

    vr_concierge::run(args).await
}
