use lawdesk::actuators::speech::{CpalSink, SpeechClient, speak};
use lawdesk::config::SpeechConfig;

const SAMPLE_TEXT: &str = "좋아요! 같이 해보자요. 종이컵으로 물 3컵을 냄비에 부어요.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lawdesk::logging::init();

    // Load configuration
    let config = SpeechConfig::from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        SAMPLE_TEXT.to_owned()
    } else {
        args.join(" ")
    };

    let client = SpeechClient::new(&config);
    let mut sink = CpalSink::open_default()?;
    speak(&client, &mut sink, &text).await?;
    Ok(())
}
