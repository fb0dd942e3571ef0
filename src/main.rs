use clap::Parser;
use remine_scout::assembler;
use remine_scout::forward;
use remine_scout::logger;
use remine_scout::scrapers::{
    normalize_address, BoundedWait, ChromeDriver, Credentials, PageDriver, RemineFlow,
};
use remine_scout::{CliArgs, Config, PropertyRecord};
use std::io::{self, BufRead, Write};
use tracing::{error, info};

const END_SENTINEL: &str = "END";

/// Print `message` and read one line from stdin. `None` once stdin is closed.
fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Keep the browser open for inspection until the operator types the sentinel.
fn wait_for_end(driver: &mut ChromeDriver) -> anyhow::Result<()> {
    loop {
        match prompt("Write 'END' to Stop: ")? {
            Some(line) if line == END_SENTINEL => break,
            Some(_) => info!("Browser session left open"),
            None => break,
        }
    }
    driver.quit()?;
    Ok(())
}

async fn scrape(config: &Config, address: &str, driver: &mut ChromeDriver) -> anyhow::Result<()> {
    let credentials = Credentials {
        username: config.username.clone(),
        password: config.password.clone(),
        login_url: config.login_url.clone(),
        remine_search: config.remine_search.clone(),
    };

    let fields = RemineFlow::new(driver, BoundedWait::new(config.wait_timeout()))
        .with_settle_delay(config.settle_delay())
        .run(&credentials, address)?;

    let record = PropertyRecord::assemble(address, &fields)?;
    println!("{}", record);

    match &config.crm {
        Some(crm) => {
            forward::forward_to_crm(crm, &record).await;
        }
        None => info!("CRM forwarding disabled"),
    }

    let (labels, values) = assembler::partition(fields.as_slice())?;
    assembler::write_table(&config.output_path, &labels, &values)?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logger::init(args.verbose);

    info!("🏠 Remine Scout - public records scraper");

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.merge_cli(&args);

    let raw_address = match &args.address {
        Some(address) => address.clone(),
        None => prompt("Enter Property Address: ")?.unwrap_or_default(),
    };
    let address = normalize_address(&raw_address)?;

    let mut driver = ChromeDriver::launch(config.headless)?;

    if let Err(e) = scrape(&config, &address, &mut driver).await {
        error!("❌ Scrape of {} failed: {:#}", address, e);
        driver.quit()?;
        return Err(e);
    }

    wait_for_end(&mut driver)
}
