use clap::Parser;

use catalog_cli::{Cli, run};

fn main() {
    let cli = Cli::parse();
    catalog_observability::init_with(cli.log_format());

    match run(cli) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
