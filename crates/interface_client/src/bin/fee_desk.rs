//! Fee Desk - command line for the fee engine
//!
//! # Usage
//!
//! ```bash
//! fee-desk invoice record.json      # print the invoice for a saved record
//! fee-desk split 9000 3000          # show an installment split
//! fee-desk login admin@lms.test pw  # log in and persist the session
//! fee-desk admission 6650f1c2...    # fetch an admission and print its invoice
//! fee-desk courses                  # list the course catalogue
//! fee-desk logout
//! ```
//!
//! # Environment Variables
//!
//! * `LMS_API_BASE_URL` - Backend base URL (default: http://localhost:5000/api)
//! * `LMS_REQUEST_TIMEOUT_SECS` - Request timeout (default: 30)
//! * `LMS_SESSION_PATH` - Session file (default: .fee-desk/session.json)
//! * `LMS_TIMEZONE` - Business timezone (default: Asia/Kolkata)
//! * `LMS_LOCALE` - Date display locale (default: en-IN)
//! * `LMS_CURRENCY` - Fee currency (default: INR)
//! * `LMS_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{AdmissionId, Money};
use domain_fees::{EnrollmentPort, EnrollmentRecord, EnrollmentService, InstallmentCalculator, InvoiceProjector};
use interface_client::{ApiClient, ClientConfig, ClientError, Credentials, HttpEnrollmentAdapter, SessionStore};

const USAGE: &str = "usage: fee-desk <invoice FILE | split TOTAL FIRST | login EMAIL PASSWORD | logout | admission ID | courses>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env().unwrap_or_else(|err| {
        eprintln!("ignoring invalid LMS_ settings: {}", err);
        ClientConfig::default()
    });
    init_tracing(&config.log_level);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["invoice", file] => print_record_invoice(&config, file),
        ["split", total, first] => print_split(&config, total, first),
        ["login", email, password] => login(&config, email, password).await,
        ["logout"] => logout(&config).await,
        ["admission", id] => print_admission_invoice(&config, id).await,
        ["courses"] => print_courses(&config).await,
        _ => bail!(USAGE),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn projector(config: &ClientConfig) -> anyhow::Result<InvoiceProjector> {
    Ok(InvoiceProjector::for_today(
        config.fee_currency()?,
        config.date_locale()?,
        &config.business_timezone()?,
    ))
}

fn api_client(config: &ClientConfig) -> anyhow::Result<(ApiClient, SessionStore)> {
    let store = SessionStore::new(&config.session_path);
    let session = store.load().context("could not restore session")?;
    let client = ApiClient::new(config, session.into_shared())?;
    Ok((client, store))
}

fn print_record_invoice(config: &ClientConfig, file: &str) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file).with_context(|| format!("could not read {}", file))?;
    let record: EnrollmentRecord =
        serde_json::from_str(&contents).with_context(|| format!("{} is not an enrollment record", file))?;

    let invoice = projector(config)?.project(&record)?;
    print!("{}", invoice);
    Ok(())
}

fn print_split(config: &ClientConfig, total: &str, first: &str) -> anyhow::Result<()> {
    let currency = config.fee_currency()?;
    let total = Money::parse(total, currency)?;
    let first = Money::parse(first, currency)?;

    let derived = InstallmentCalculator::split_remainder(&total, &first)?;
    println!("Installment 1: {}", first.to_fixed2());
    println!("Installment 2: {}", derived.second.to_fixed2());
    println!("Installment 3: {}", derived.third.to_fixed2());
    Ok(())
}

async fn login(config: &ClientConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let (client, store) = api_client(config)?;
    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };

    let auth = client.login(&store, &credentials).await?;
    println!("Logged in as {}", auth.role);
    Ok(())
}

async fn logout(config: &ClientConfig) -> anyhow::Result<()> {
    let (client, store) = api_client(config)?;
    client.logout(&store).await?;
    println!("Logged out");
    Ok(())
}

async fn adapter(config: &ClientConfig) -> anyhow::Result<Arc<HttpEnrollmentAdapter>> {
    let (client, _) = api_client(config)?;
    if !client.session().read().await.is_authenticated() {
        return Err(ClientError::NotLoggedIn).context("run `fee-desk login EMAIL PASSWORD` first");
    }
    Ok(Arc::new(HttpEnrollmentAdapter::new(client, config.fee_currency()?)))
}

async fn print_admission_invoice(config: &ClientConfig, id: &str) -> anyhow::Result<()> {
    let id = AdmissionId::new(id)?;
    let service = EnrollmentService::new(adapter(config).await?);

    let invoice = service.admission_invoice(&id, &projector(config)?).await?;
    print!("{}", invoice);
    Ok(())
}

async fn print_courses(config: &ClientConfig) -> anyhow::Result<()> {
    let port = adapter(config).await?;
    for course in port.list_courses().await? {
        println!("{:<28} {:<32} {:>12}", course.id.as_str(), course.title, course.price.to_fixed2());
    }
    Ok(())
}
