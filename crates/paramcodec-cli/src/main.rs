//! paramcodec CLI entrypoint
//! Loads a service configuration and exercises its parameter codecs.

// Internal imports (std, crate)
use std::path::PathBuf;
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use paramcodec_core::config::OperationConfig;
use paramcodec_core::{
    CodecConfig, FilePart, HttpServerRequest, OperationCodec, ProcessorRegistry,
    RestClientRequest,
};
use serde_json::{json, Value as JsonValue};
use tokio::fs;

#[derive(Parser)]
#[command(name = "paramcodec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the processors built for every operation
    Inspect {
        /// Service configuration (YAML, JSON or TOML)
        #[arg(long)]
        config: PathBuf,
    },
    /// Decode a raw request into the operation's arguments
    Decode {
        /// Service configuration (YAML, JSON or TOML)
        #[arg(long)]
        config: PathBuf,
        /// Operation id
        #[arg(long)]
        operation: String,
        /// Query string, without the leading '?'
        #[arg(long)]
        query: Option<String>,
        /// urlencoded form body
        #[arg(long)]
        form: Option<String>,
        /// Cookie header value
        #[arg(long)]
        cookie: Option<String>,
        /// Header as 'Name: value'; may be repeated
        #[arg(long = "header")]
        headers: Vec<String>,
        /// Request path, matched against the operation's path template
        #[arg(long)]
        path: Option<String>,
        /// Multipart file as 'name=FILE'; may be repeated
        #[arg(long = "part")]
        parts: Vec<String>,
        /// Raw request body
        #[arg(long)]
        body: Option<String>,
    },
    /// Encode JSON arguments into request fields
    Encode {
        /// Service configuration (YAML, JSON or TOML)
        #[arg(long)]
        config: PathBuf,
        /// Operation id
        #[arg(long)]
        operation: String,
        /// Arguments as a JSON object keyed by parameter name
        #[arg(long)]
        args: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { config } => {
            let config = load_config(&config).await?;
            let registry = ProcessorRegistry::with_defaults();
            for op in &config.operations {
                let codec = op.build_codec(&registry)?;
                println!("{} {} {}", op.id, op.method, op.path);
                for (descriptor, processor) in op.descriptors()?.iter().zip(codec.processors()) {
                    let default = descriptor
                        .default_value
                        .as_ref()
                        .map(|v| format!(" default={}", v))
                        .unwrap_or_default();
                    println!(
                        "  {:<16} {:<9} {:<10} {:<16} required={}{}",
                        processor.name(),
                        processor.location().as_str(),
                        processor.kind().as_str(),
                        processor.target_type().to_string(),
                        descriptor.required,
                        default
                    );
                }
            }
        }
        Commands::Decode {
            config,
            operation,
            query,
            form,
            cookie,
            headers,
            path,
            parts,
            body,
        } => {
            let config = load_config(&config).await?;
            let (op, codec) = operation_codec(&config, &operation)?;

            let mut request = HttpServerRequest::new();
            if let Some(query) = &query {
                request = request.with_query(query);
            }
            if let Some(form) = &form {
                request = request.with_form(form);
            }
            if let Some(cookie) = &cookie {
                request = request.with_cookie_header(cookie);
            }
            for header in &headers {
                let (name, value) = header
                    .split_once(':')
                    .with_context(|| format!("Header '{}' is not 'Name: value'", header))?;
                request = request.with_header(name.trim(), value.trim());
            }
            if let Some(path) = &path {
                request = request.with_path_template(&op.path, path)?;
            }
            for part in &parts {
                let (name, file) = part
                    .split_once('=')
                    .with_context(|| format!("Part '{}' is not 'name=FILE'", part))?;
                let data = fs::read(file)
                    .await
                    .with_context(|| format!("Failed to read part file {}", file))?;
                let mut file_part = FilePart::new(name, data);
                if let Some(file_name) = PathBuf::from(file).file_name() {
                    file_part = file_part.with_file_name(file_name.to_string_lossy());
                }
                request = request.with_part(file_part);
            }
            if let Some(body) = body {
                request = request.with_body(body);
            }

            match codec.decode_json(&request) {
                Ok(args) => {
                    tracing::info!(operation = %operation, count = args.len(), "decoded arguments");
                    println!("{}", serde_json::to_string_pretty(&JsonValue::Object(args))?);
                }
                Err(err) if err.is_client_fault() => {
                    tracing::warn!(operation = %operation, error = %err, "rejected request");
                    eprintln!("{} {}", err.status_code(), err);
                    return Ok(ExitCode::from(2));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Encode {
            config,
            operation,
            args,
        } => {
            let config = load_config(&config).await?;
            let (op, codec) = operation_codec(&config, &operation)?;
            let args: JsonValue = serde_json::from_str(&args).context("--args is not valid JSON")?;
            let args = args
                .as_object()
                .context("--args must be a JSON object")?;

            let mut request = RestClientRequest::new();
            codec.encode_json(&mut request, args)?;
            let path = request.path(&op.path)?;
            let url = config
                .base_url
                .as_ref()
                .map(|base| format!("{}{}", base.as_str().trim_end_matches('/'), path));

            let output = json!({
                "method": op.method,
                "path": path,
                "url": url,
                "query": request.query_string(),
                "form": request.form_body(),
                "cookie": request.cookie_header(),
                "headers": request
                    .headers()
                    .iter()
                    .map(|(k, v)| json!([k, v]))
                    .collect::<Vec<_>>(),
                "body": request
                    .body()
                    .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn load_config(path: &PathBuf) -> anyhow::Result<CodecConfig> {
    tracing::debug!(path = %path.display(), "loading service configuration");
    CodecConfig::from_file(path)
        .await
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn operation_codec<'a>(
    config: &'a CodecConfig,
    operation: &str,
) -> anyhow::Result<(&'a OperationConfig, OperationCodec)> {
    let op = config.operation(operation).with_context(|| {
        format!(
            "Operation '{}' not found in service '{}'",
            operation, config.service_name
        )
    })?;
    let codec = op
        .build_codec(&ProcessorRegistry::with_defaults())
        .with_context(|| format!("Failed to build codec for operation '{}'", operation))?;
    Ok((op, codec))
}
