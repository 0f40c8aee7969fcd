use clap::Parser;
use fcm_sender::{
    FcmSender, NotificationRequest, SendResponse, SendResult, SenderConfig, google,
};
use serde_json::{Map, Value};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Send a push notification through Firebase Cloud Messaging
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Service account key, a local path or an http(s) URL
    #[arg(long, env = "FIREBASE_FILE")]
    firebase_file: String,

    /// Device registration token
    #[arg(long)]
    token: String,

    #[arg(long)]
    title: String,

    #[arg(long)]
    body: String,

    /// Icon URL, or a path relative to --asset-base-url
    #[arg(long)]
    icon: Option<String>,

    /// Data entry as key=value, may be repeated
    #[arg(long = "data", value_parser = parse_key_val, conflicts_with = "data_json")]
    data: Vec<(String, String)>,

    /// Whole data payload as a JSON object
    #[arg(long, value_parser = parse_json)]
    data_json: Option<Value>,

    #[command(flatten)]
    config: SenderConfig,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{s}`"))
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| e.to_string())
}

impl Cli {
    fn request(&mut self) -> NotificationRequest {
        let data = match self.data_json.take() {
            Some(json) => Some(json),
            None if self.data.is_empty() => None,
            None => Some(Value::Object(
                self.data
                    .drain(..)
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect::<Map<_, _>>(),
            )),
        };

        NotificationRequest {
            device_token: std::mem::take(&mut self.token),
            title: std::mem::take(&mut self.title),
            body: std::mem::take(&mut self.body),
            icon: self.icon.take(),
            data,
        }
    }
}

async fn run(mut cli: Cli) -> SendResult {
    let request = cli.request();
    let provider = google::from_locator(&cli.firebase_file);
    let sender = match FcmSender::new(cli.config, provider.as_ref()).await {
        Ok(sender) => sender,
        Err(e) => {
            error!(error = %e, "failed to set up fcm sender");
            return SendResult::from(Err::<SendResponse, _>(e));
        }
    };

    sender.send_fcm(&request).await.into()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = run(Cli::parse()).await;
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Error: {:?}", e),
    }
    if !result.success {
        std::process::exit(1)
    }
}
