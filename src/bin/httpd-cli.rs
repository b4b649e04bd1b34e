use clap::{Parser, ValueEnum};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

#[derive(Parser)]
#[command(name = "httpd-cli")]
#[command(about = "Send a request to an embedded-httpd instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:80")]
    url: String,

    #[arg(short = 'X', long, value_enum, default_value_t = Verb::Get)]
    method: Verb,

    /// HTTP Basic user.
    #[arg(long)]
    user: Option<String>,

    /// HTTP Basic password.
    #[arg(long)]
    password: Option<String>,

    /// JSON request body (PUT/POST).
    #[arg(short, long)]
    data: Option<String>,

    /// Request path, e.g. /api/status
    path: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Verb {
    Get,
    Head,
    Put,
    Post,
    Delete,
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Head => Method::HEAD,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.path);
    let mut request = client.request(cli.method.into(), url);
    if let Some(user) = &cli.user {
        request = request.basic_auth(user, cli.password.as_deref());
    }
    if let Some(data) = cli.data {
        let body: serde_json::Value = serde_json::from_str(&data)?;
        request = request.json(&body);
    }

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    eprintln!("{} ({})", status, content_type);

    if content_type.starts_with("application/json") {
        let json: serde_json::Value = res.json().await?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        let bytes = res.bytes().await?;
        println!("{}", String::from_utf8_lossy(&bytes));
    }
    Ok(())
}
