// Generates the deterministic fixtures used by tests and benchmarks: a random road network in the
// four-line cities format and a synthetic course schedule. Both land in OUT_DIR and are pulled in
// by src/fixtures.rs. Keep the counts here in sync with the constants in that module.

use std::{collections::HashSet, fmt::Write as _, path::Path};

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

const NUM_CITIES: usize = 2_000;
const NUM_SCHEDULE_LINES: usize = 5_000;

// Extra roads per city on top of the one that keeps the network connected.
const EDGES_PER: [u8; 5] = [0, 1, 2, 3, 4];
const WEIGHTS: [u8; 5] = [4, 26, 67, 31, 3];

const SUBJECTS: [&str; 8] = ["ART", "BIOL", "CHEM", "COMSC", "ENGL", "MATH", "PHYS", "SPAN"];
const SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];
const INSTRUCTORS: [&str; 6] = ["Burns", "Lee", "Nguyen", "Ortiz", "Smith", "Tanaka"];
const DAYS: [&str; 4] = ["MW", "TTH", "MWF", "Online"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let out_dir = Path::new(&out_dir);

    // We use a seeded RNG so every build sees the same fixtures.
    let mut rng = ChaCha20Rng::seed_from_u64(0x4FA7905BF65E7E9D);
    std::fs::write(out_dir.join("roads.txt"), new_random_roads(&mut rng))
        .expect("could not write roads fixture");
    std::fs::write(out_dir.join("schedule.txt"), new_random_schedule(&mut rng))
        .expect("could not write schedule fixture");
}

fn city_name(i: usize) -> String {
    format!("Town {:04}", i)
}

/// Cities mostly connect to their numeric neighbors with the occasional long road, which gives
/// searches some depth instead of a small-world blob.
fn new_random_roads(rng: &mut ChaCha20Rng) -> String {
    let dist = WeightedIndex::new(WEIGHTS).expect("weights are non-zero");
    let mut connections: HashSet<(usize, usize)> = HashSet::new();
    let mut out = String::new();

    let mut push_road = |out: &mut String, a: usize, b: usize, rng: &mut ChaCha20Rng| {
        let key = (a.min(b), a.max(b));
        if a == b || !connections.insert(key) {
            return;
        }
        let cost: u32 = rng.gen_range(5..120);
        let _ = write!(
            out,
            "{}\n{}\n{}\n----------\n",
            city_name(a),
            city_name(b),
            cost
        );
    };

    for src in 1..NUM_CITIES {
        // Every city links back to some earlier one, so the whole network is connected.
        let back = rng.gen_range(src.saturating_sub(16)..src);
        push_road(&mut out, src, back, &mut *rng);

        let num_outgoing = EDGES_PER[dist.sample(rng)];
        for _ in 0..num_outgoing {
            let near_prob = rng.gen_range(0..1000);
            let reach = match near_prob {
                990.. => 256,
                940.. => 64,
                _ => 16,
            };
            let lo = src.saturating_sub(reach);
            let hi = (src + reach).min(NUM_CITIES);
            let dest = rng.gen_range(lo..hi);
            push_road(&mut out, src, dest, &mut *rng);
        }
    }
    out
}

fn new_random_schedule(rng: &mut ChaCha20Rng) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(NUM_SCHEDULE_LINES);
    lines.push("Term\tSection\tCourse\tInstructor\tWhen".to_string());

    while lines.len() < NUM_SCHEDULE_LINES {
        // Roughly one line in fifty is a verbatim repeat, like the real dump.
        if lines.len() > 1 && rng.gen_ratio(1, 50) {
            let i = rng.gen_range(1..lines.len());
            let repeat = lines[i].clone();
            lines.push(repeat);
            continue;
        }
        let line = format!(
            "{} {}\t{:04}\t{}-{}\t{}\t{}",
            SEASONS.choose(rng).copied().unwrap_or("Fall"),
            rng.gen_range(2010..=2018),
            rng.gen_range(1000..10000),
            SUBJECTS.choose(rng).copied().unwrap_or("COMSC"),
            rng.gen_range(100..300),
            INSTRUCTORS.choose(rng).copied().unwrap_or("Staff"),
            DAYS.choose(rng).copied().unwrap_or("Online"),
        );
        lines.push(line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
