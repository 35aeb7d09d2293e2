//! Run workloads concurrently against the dataset service and print metrics.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};
use sketches_ddsketch::DDSketch;
use tokio::sync::Semaphore;
use yansi::Paint;

use crate::http::HttpRemote;
use crate::workload::Workload;

/// Runs the given workloads concurrently against the remote.
///
/// All workloads run until the duration elapses, then a per-workload report
/// and a combined report are printed.
pub async fn run(remote: HttpRemote, workloads: Vec<Workload>, duration: Duration) -> Result<()> {
    let remote = Arc::new(remote);

    let bar = ProgressBar::new_spinner()
        .with_style(ProgressStyle::with_template("{spinner} {msg} {elapsed}")?)
        .with_message("Running load test:");
    bar.enable_steady_tick(Duration::from_millis(100));

    // run the workloads concurrently
    let tasks: Vec<_> = workloads
        .into_iter()
        .map(|workload| {
            let remote = Arc::clone(&remote);
            tokio::spawn(run_workload(remote, workload, duration))
        })
        .collect();

    let finished_tasks = futures::future::join_all(tasks).await;
    bar.finish_and_clear();

    let mut totals = WorkloadMetrics::default();
    for task in finished_tasks {
        let (workload, metrics) = task?;

        println!();
        println!(
            "{} {} (concurrency: {})",
            "## Workload".bold(),
            workload.name.bold().blue(),
            workload.concurrency.bold()
        );
        print_metrics(&metrics, duration);

        totals.merge(metrics);
    }

    println!();
    println!("{}", "## TOTALS".bold());
    print_metrics(&totals, duration);

    Ok(())
}

async fn run_workload(
    remote: Arc<HttpRemote>,
    mut workload: Workload,
    duration: Duration,
) -> (Workload, WorkloadMetrics) {
    let concurrency = workload.concurrency;
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let deadline = tokio::time::Instant::now() + duration;

    let metrics = Arc::new(Mutex::new(WorkloadMetrics::default()));

    // See <https://docs.rs/tokio/latest/tokio/time/struct.Sleep.html#examples>
    let sleep = tokio::time::sleep_until(deadline);
    tokio::pin!(sleep);

    loop {
        if deadline.elapsed() > Duration::ZERO {
            break;
        }
        tokio::select! {
            permit = semaphore.clone().acquire_owned() => {
                let action = workload.next_action();
                let wait = workload.next_wait();
                let remote = Arc::clone(&remote);
                let metrics = Arc::clone(&metrics);

                let task = async move {
                    let name = action.name();
                    let start = Instant::now();

                    let mut bytes_read = 0;
                    let mut failed = false;
                    for request in action.requests() {
                        match remote.get(&request).await {
                            Ok(len) => bytes_read += len,
                            Err(err) => {
                                eprintln!("error fetching {}: {err:#}", request.path);
                                failed = true;
                                break;
                            }
                        }
                    }

                    {
                        let mut metrics = metrics.lock().unwrap();
                        let stats = metrics.actions.entry(name).or_default();
                        if failed {
                            stats.failures += 1;
                        } else {
                            stats.timing.add(start.elapsed().as_secs_f64());
                            stats.bytes_read += bytes_read;
                        }
                    }

                    // The permit stays held through the think time, so one
                    // simulated user covers the action plus its pause.
                    if let Some(wait) = wait {
                        tokio::time::sleep(wait).await;
                    }
                    drop(permit);
                };
                tokio::spawn(task);
            }
            _ = &mut sleep => {
                break;
            }
        }
    }

    // by acquiring *all* the permits, we essentially wait for all outstanding tasks to finish
    let _permits = semaphore.acquire_many(concurrency as u32).await;

    let metrics = {
        let mut metrics = metrics.lock().unwrap();
        std::mem::take(&mut *metrics)
    };

    (workload, metrics)
}

#[derive(Default)]
struct WorkloadMetrics {
    actions: BTreeMap<&'static str, ActionMetrics>,
}

#[derive(Default)]
struct ActionMetrics {
    timing: DDSketch,
    bytes_read: u64,
    failures: u64,
}

impl WorkloadMetrics {
    fn merge(&mut self, other: WorkloadMetrics) {
        for (name, stats) in other.actions {
            let entry = self.actions.entry(name).or_default();
            entry.timing.merge(&stats.timing).unwrap();
            entry.bytes_read += stats.bytes_read;
            entry.failures += stats.failures;
        }
    }
}

fn print_metrics(metrics: &WorkloadMetrics, duration: Duration) {
    for (name, stats) in &metrics.actions {
        let ops = stats.timing.count();
        if ops == 0 && stats.failures == 0 {
            continue;
        }

        let label = name.to_uppercase();
        print!("{} ({} ops", label.bold().green(), ops.bold());
        if stats.failures > 0 {
            print!(
                ", {}",
                format!("{} FAILURES", stats.failures).bold().red()
            );
        }
        println!(")");

        if ops > 0 {
            print_ops(&stats.timing, duration);
            print_throughput(stats.bytes_read, duration);
            print_percentiles(&stats.timing, Duration::from_secs_f64);
        }
    }
}

fn print_percentiles<T: fmt::Debug>(sketch: &DDSketch, map: impl Fn(f64) -> T) {
    let ops = sketch.count();
    let avg = map(sketch.sum().unwrap() / ops as f64);
    let p50 = map(sketch.quantile(0.5).unwrap().unwrap());
    let p90 = map(sketch.quantile(0.9).unwrap().unwrap());
    let p99 = map(sketch.quantile(0.99).unwrap().unwrap());
    println!(
        "  avg: {:.2?}; p50: {p50:.2?}; p90: {p90:.2?}; p99: {p99:.2?}",
        avg.bold()
    );
}

fn print_ops(sketch: &DDSketch, duration: Duration) {
    let ops = sketch.count();
    let ops_ps = ops as f64 / duration.as_secs_f64();
    print!("  {:.2} operations/s", ops_ps.bold());
}

fn print_throughput(total: u64, duration: Duration) {
    let throughput = (total as f64 / duration.as_secs_f64()) as u64;
    println!(", {:.2}/s", ByteSize::b(throughput).bold());
}
