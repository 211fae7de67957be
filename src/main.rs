use anyhow::Context;
use soa_webservices::models::{parse_br_date, PessoaFisica};
use soa_webservices::{CallContext, Config, SoaClient};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: soa-lookup cep <cep> | cpf <cpf> <dd/mm/yyyy> | cnpj <cnpj>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soa_webservices=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Load configuration
    let config = Config::from_env()?;
    let client = SoaClient::from_config(&config)?;

    let mut ctx = CallContext::new();
    if let Some(ms) = std::env::var("SOA_DEADLINE_MS").ok().filter(|s| !s.trim().is_empty()) {
        let ms: u64 = ms
            .trim()
            .parse()
            .context("SOA_DEADLINE_MS must be a whole number of milliseconds")?;
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }

    // Ctrl-C abandons the in-flight lookup
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling lookup");
            interrupt.cancel();
        }
    });

    let output = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["cep", cep] => serde_json::to_string_pretty(&client.consultar_cep(&ctx, cep).await?)?,
        ["cpf", cpf, nascimento] => {
            let data_nascimento = parse_br_date(nascimento)
                .with_context(|| format!("birth date '{}' is not dd/mm/yyyy", nascimento))?;
            let pessoa: PessoaFisica = client.consultar_cpf(&ctx, cpf, data_nascimento).await?;
            serde_json::to_string_pretty(&pessoa)?
        }
        ["cnpj", cnpj] => serde_json::to_string_pretty(&client.consultar_cnpj(&ctx, cnpj).await?)?,
        _ => anyhow::bail!(USAGE),
    };

    println!("{}", output);
    Ok(())
}
