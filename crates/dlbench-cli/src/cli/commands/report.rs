//! Terminal report: attempt table plus run statistics.

use dlbench_core::attempt::AttemptStatus;
use dlbench_core::fmt::{format_bytes, format_duration_secs, format_speed};
use dlbench_core::run::RunController;

fn status_label(status: AttemptStatus) -> &'static str {
    match status {
        AttemptStatus::Pending => "pending",
        AttemptStatus::Downloading => "downloading",
        AttemptStatus::Completed => "completed",
        AttemptStatus::Error => "error",
    }
}

pub fn print_run(controller: &RunController) {
    let snapshot = controller.snapshot();

    println!(
        "  {:>4}  {:<11}  {:<8}  {:>10}  {:>10}  {:>9}  {:>6}  {:>7}",
        "Seq", "Status", "Cache", "Size", "Transfer", "Total", "Stalls", "Degr%"
    );
    for a in &snapshot.attempts {
        println!(
            "  {:>4}  {:<11}  {:<8}  {:>10}  {:>10}  {:>9}  {:>6}  {:>7.1}",
            a.sequence,
            status_label(a.status),
            a.cache_status.as_deref().unwrap_or("-"),
            format_bytes(a.bytes_total),
            format_duration_secs(a.transfer_elapsed_secs),
            format_duration_secs(a.total_elapsed_secs),
            a.stall_count,
            a.degradation_percent,
        );
        if let Some(detail) = &a.error_detail {
            println!("        error: {}", detail);
        }
    }

    let stats = controller.statistics();
    println!(
        "  completed {} / failed {} of {}",
        stats.completed,
        stats.failed,
        snapshot.attempts.len()
    );
    println!(
        "  mean transfer {}   mean queue wait {}   mean total {}",
        format_duration_secs(stats.mean_transfer_secs),
        format_duration_secs(stats.mean_queue_wait_secs),
        format_duration_secs(stats.mean_total_secs),
    );
    println!(
        "  mean speed {:.2} Mbps   mean loss {:.2} %   ({} bandwidth samples)",
        stats.mean_throughput_mbps,
        stats.mean_loss_percent,
        snapshot.samples.len()
    );
    if let Some(peak) = snapshot
        .samples
        .iter()
        .map(|s| s.bandwidth_mbps)
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    {
        println!(
            "  peak aggregate bandwidth {:.2} Mbps ({})",
            peak,
            format_speed(peak * 1_048_576.0 / 8.0)
        );
    }
}
