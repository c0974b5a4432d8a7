//! `dlbench profiles` – list builtin profiles.

use dlbench_core::profile::PROFILES;

pub fn run_profiles() {
    println!(
        "  {:<14}  {:<6}  {:<7}  {}",
        "Id", "Accel", "Caching", "Title"
    );
    for p in PROFILES {
        println!(
            "  {:<14}  {:<6}  {:<7}  {}",
            p.id,
            if p.acceleration { "yes" } else { "no" },
            if p.caching { "yes" } else { "no" },
            p.title
        );
    }
}
