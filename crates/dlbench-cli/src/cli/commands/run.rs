//! `dlbench run <url>` – one benchmark run under one profile.

use std::time::Duration;

use anyhow::Result;
use dlbench_core::config::BenchConfig;
use dlbench_core::profile;
use dlbench_core::run::RunController;
use dlbench_core::transport::CurlTransport;

use super::report;

pub async fn run_single(
    cfg: &BenchConfig,
    url: &str,
    profile_id: &str,
    fanout: Option<usize>,
) -> Result<()> {
    let Some(profile) = profile::find(profile_id) else {
        anyhow::bail!("unknown profile: {} (see `dlbench profiles`)", profile_id);
    };
    let fanout = fanout.unwrap_or(cfg.fanout).max(1);
    let transport = CurlTransport::new(Duration::from_secs(
        cfg.connect_timeout_secs.unwrap_or(30),
    ));

    let controller = RunController::new(profile, cfg);
    controller.start_run(&transport, url, fanout).await?;
    report::print_run(&controller);
    Ok(())
}
