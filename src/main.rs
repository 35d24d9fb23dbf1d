use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use mpesa_qr::config::AppConfig;
use mpesa_qr::{compute_checksum, Payload, PaymentKind, PaymentRequest};

#[derive(Parser)]
#[command(name = "mpesa-qr", about = "Generate and check M-PESA merchant QR payloads")]
struct Cli {
    /// Log normalisation and checksum details
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a payload string ready for QR encoding
    Generate {
        /// paybill, till or phone
        #[arg(long = "type", short = 't')]
        kind: Option<PaymentKind>,
        /// Paybill, till or phone number; separators are ignored
        #[arg(long, short, default_value = "")]
        number: String,
        /// Paybill account reference
        #[arg(long, short)]
        account: Option<String>,
        /// Merchant name shown by the payer's app
        #[arg(long = "name")]
        business_name: Option<String>,
        /// Print a JSON object instead of the bare payload
        #[arg(long)]
        json: bool,
    },
    /// Verify a payload's checksum and show what it encodes
    Decode {
        payload: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the CRC-16 checksum of arbitrary text
    Checksum { text: String },
    /// Show or update stored defaults
    Config {
        #[arg(long)]
        set_name: Option<String>,
        #[arg(long)]
        set_type: Option<PaymentKind>,
        #[arg(long)]
        set_account: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "mpesa_qr=debug" } else { "mpesa_qr=info" };
    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load();
    debug!("Loaded config from {}", AppConfig::path().display());

    match cli.command {
        Command::Generate {
            kind,
            number,
            account,
            business_name,
            json,
        } => {
            let Some(kind) = kind.or(config.payment_type) else {
                bail!("No payment type given; pass --type or set one with `mpesa-qr config --set-type`");
            };
            let request = PaymentRequest::new(kind, number)
                .with_account(account.or(config.account_number).unwrap_or_default())
                .with_business_name(business_name.or(config.business_name).unwrap_or_default());
            run_generate(&request, json)
        }
        Command::Decode { payload, json } => run_decode(&payload, json),
        Command::Checksum { text } => {
            println!("{}", compute_checksum(&text));
            Ok(())
        }
        Command::Config {
            set_name,
            set_type,
            set_account,
        } => run_config(config, set_name, set_type, set_account),
    }
}

fn run_generate(request: &PaymentRequest, json: bool) -> Result<()> {
    let payload = match request.build() {
        Ok(payload) => payload,
        // Blank number: nothing to show, and nothing wrong either.
        Err(e) if e.is_empty_input() => {
            info!("Enter a {} number to generate a QR payload", request.kind);
            return Ok(());
        }
        Err(e) => return Err(e).context("Cannot generate QR payload"),
    };

    info!("Generated {} payload ({} chars)", request.kind, payload.len());
    if json {
        let decoded = Payload::parse(&payload)?.decode()?;
        let out = serde_json::json!({
            "payload": payload,
            "type": request.kind,
            "number": decoded.target.identifier(),
            "checksum": decoded.checksum,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", payload);
    }
    Ok(())
}

fn run_decode(raw: &str, json: bool) -> Result<()> {
    let payload = Payload::parse(raw.trim()).context("Payload rejected")?;
    let decoded = payload.decode()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    for field in &payload.fields {
        println!("{} {:02} {}", field.tag, field.len(), field.value);
    }
    println!();
    println!("type:     {}", decoded.target.kind());
    println!("number:   {}", decoded.target.identifier());
    if let Some(account) = decoded.target.account_ref() {
        println!("account:  {}", account);
    }
    if let Some(name) = &decoded.merchant.name {
        println!("merchant: {}", name);
    }
    println!("currency: {} ({})", decoded.currency, decoded.country);
    println!("checksum: {} (ok)", decoded.checksum);
    Ok(())
}

fn run_config(
    mut config: AppConfig,
    set_name: Option<String>,
    set_type: Option<PaymentKind>,
    set_account: Option<String>,
) -> Result<()> {
    let changed = set_name.is_some() || set_type.is_some() || set_account.is_some();
    if let Some(name) = set_name {
        config.business_name = (!name.is_empty()).then_some(name);
    }
    if let Some(kind) = set_type {
        config.payment_type = Some(kind);
    }
    if let Some(account) = set_account {
        config.account_number = (!account.is_empty()).then_some(account);
    }
    if changed {
        config.save()?;
    }

    println!("# {}", AppConfig::path().display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
