//! `dlbench matrix <url>` – all four profiles, one after another.

use std::time::Duration;

use anyhow::Result;
use dlbench_core::config::BenchConfig;
use dlbench_core::profile;
use dlbench_core::session::Session;
use dlbench_core::transport::CurlTransport;

use super::report;

pub async fn run_matrix(cfg: &BenchConfig, url: &str, fanout: Option<usize>) -> Result<()> {
    let fanout = fanout.unwrap_or(cfg.fanout).max(1);
    let transport = CurlTransport::new(Duration::from_secs(
        cfg.connect_timeout_secs.unwrap_or(30),
    ));

    let mut session = Session::new(cfg);
    for p in profile::PROFILES {
        session.select(p.id)?;
        let controller = session.selected();
        println!("== {} ({}) ==", p.id, p.title);
        controller.start_run(&transport, url, fanout).await?;
        report::print_run(controller);
        println!();
    }
    Ok(())
}
