//! Subcommand handlers. Everything reads from and writes to a [`Session`] so the interactive
//! loops can be driven from tests.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use comp220::{
    array::SortableArray,
    graph::RoadGraph,
    hashtable::HashTable,
    rpn::{Calculator, Response},
    schedule::{self, CourseIndex, Schedule},
    simulation::{ServerConfig, Simulation},
    sorting::{doubling_table, SortAlgorithm},
    Error, Result,
};

use crate::cli::{Commands, RouteMode, ScheduleReport, SortBenchArgs, TraversalOrder};

pub struct Session<R, W> {
    input: R,
    out: W,
    json: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, json: bool) -> Self {
        Session { input, out, json }
    }

    /// Reads one trimmed line. None at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prints `msg` and reads an answer. A blank answer counts as no answer.
    fn prompt(&mut self, msg: &str) -> Result<Option<String>> {
        write!(self.out, "{}", msg)?;
        self.out.flush()?;
        Ok(self.read_line()?.filter(|line| !line.is_empty()))
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

pub fn run<R: BufRead, W: Write>(command: Commands, session: &mut Session<R, W>) -> Result<()> {
    match command {
        Commands::Traverse {
            order,
            cities,
            start,
        } => {
            let graph = RoadGraph::load_unweighted(&cities.path)?;
            log::info!("loaded {} cities from {}", graph.len(), cities.path.display());
            traverse(session, &graph, order, start)
        }
        Commands::Route {
            mode,
            cities,
            from,
            to,
            matrix,
        } => {
            let graph = RoadGraph::load(&cities.path)?;
            log::info!("loaded {} cities from {}", graph.len(), cities.path.display());
            if matrix && !session.json {
                writeln!(session.out, "{}", graph.adjacency_matrix())?;
            }
            route(session, &graph, mode, from, to)
        }
        Commands::Rpn => rpn(session),
        Commands::Simulate {
            config,
            setup,
            seed,
            interactive,
        } => {
            if setup {
                ServerConfig::write_setup(&config)?;
                writeln!(
                    session.out,
                    "Generated default config file '{}'\nRe-run without --setup to run",
                    config.display()
                )?;
                return Ok(());
            }
            let config = ServerConfig::load(&config)?;
            simulate(session, config, seed, interactive)
        }
        Commands::Schedule {
            report,
            query,
            path,
        } => {
            if report == ScheduleReport::Stats {
                let file = File::open(&path).map_err(|e| Error::io(&path, e))?;
                let stats = schedule::parse_stats(BufReader::new(file))?;
                if session.json {
                    return session.json(&stats);
                }
                writeln!(
                    session.out,
                    "{} lines accepted, {} rejected",
                    stats.accepted, stats.rejected
                )?;
                for (line, reason) in &stats.first_rejections {
                    writeln!(session.out, "  line {}: {}", line, reason)?;
                }
                return Ok(());
            }
            let schedule = Schedule::load(&path)?;
            schedule_report(session, &schedule, report, query)
        }
        Commands::SortBench(args) => sort_bench(session, &args),
        Commands::Array => array(session),
        Commands::Hashtable => hashtable(session),
    }
}

/// Looks up a city, either from the command line (an unknown name is an error) or from a
/// prompt (an unknown name is reported and asked again).
fn city_or_prompt<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    graph: &RoadGraph,
    given: &mut Option<String>,
    msg: &str,
) -> Result<Option<usize>> {
    if let Some(name) = given.take() {
        return graph.require(&name).map(Some);
    }
    loop {
        let Some(name) = session.prompt(msg)? else {
            return Ok(None);
        };
        match graph.index_of(&name) {
            Some(i) => return Ok(Some(i)),
            None => writeln!(session.out, "{}", Error::UnknownCity(name))?,
        }
    }
}

fn traverse<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    graph: &RoadGraph,
    order: TraversalOrder,
    mut start: Option<String>,
) -> Result<()> {
    let once = start.is_some();
    if !session.json {
        writeln!(session.out, "Input file processed")?;
    }
    loop {
        let Some(root) = city_or_prompt(
            session,
            graph,
            &mut start,
            "\nEnter the start city [blank to exit]: ",
        )?
        else {
            return Ok(());
        };
        let visited: Vec<usize> = match order {
            TraversalOrder::Bfs => graph.bfs_iter(root).collect(),
            TraversalOrder::Dfs => graph.dfs_iter(root).collect(),
        };
        let names: Vec<&str> = visited.iter().filter_map(|&i| graph.name(i)).collect();
        if session.json {
            session.json(&names)?;
        } else {
            let label = match order {
                TraversalOrder::Bfs => "BFS",
                TraversalOrder::Dfs => "DFS",
            };
            writeln!(session.out, "{}-{}", label, names.join("-"))?;
        }
        if once {
            return Ok(());
        }
    }
}

#[derive(Debug, Serialize)]
struct RouteReport<'a> {
    cities: Vec<&'a str>,
    cost: f64,
}

fn route<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    graph: &RoadGraph,
    mode: RouteMode,
    mut from: Option<String>,
    mut to: Option<String>,
) -> Result<()> {
    let once = from.is_some() && to.is_some();
    loop {
        let Some(src) = city_or_prompt(
            session,
            graph,
            &mut from,
            "\nEnter the source city [blank to exit]: ",
        )?
        else {
            return Ok(());
        };
        let Some(dst) = city_or_prompt(
            session,
            graph,
            &mut to,
            "Enter the destination city [blank to exit]: ",
        )?
        else {
            return Ok(());
        };

        let (found, unit) = match mode {
            RouteMode::Shortest => (graph.shortest_route(src, dst), "edges"),
            RouteMode::Cheapest => (graph.cheapest_route(src, dst), "miles"),
        };
        match found {
            Some(route) if session.json => session.json(&RouteReport {
                cities: route.names(graph),
                cost: route.cost,
            })?,
            Some(route) => writeln!(session.out, "{}", route.describe_as(graph, unit))?,
            None => writeln!(
                session.out,
                "No route from {} to {}",
                graph.name(src).unwrap_or_default(),
                graph.name(dst).unwrap_or_default()
            )?,
        }
        if once {
            return Ok(());
        }
    }
}

fn rpn<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let mut calc = Calculator::new();
    writeln!(session.out, "Enter 'help' for a list of commands, 'q' to quit")?;
    while calc.is_running() {
        let Some(line) = session.read_line()? else {
            break;
        };
        match calc.eval_line(&line) {
            Ok(responses) => {
                for response in responses {
                    if response != Response::Quit {
                        writeln!(session.out, "{}", response)?;
                    }
                }
            }
            Err(e) => writeln!(session.out, "{}", e)?,
        }
    }
    Ok(())
}

fn simulate<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    config: ServerConfig,
    seed: Option<u64>,
    interactive: bool,
) -> Result<()> {
    if !session.json {
        writeln!(session.out, "{}", config)?;
    }
    let mut sim = Simulation::new(config, seed)?;
    if interactive {
        while sim.is_running() {
            sim.step();
            writeln!(session.out, "{}", sim)?;
            write!(session.out, "Press ENTER to continue, X to quit: ")?;
            session.out.flush()?;
            match session.read_line()? {
                Some(line) if line.eq_ignore_ascii_case("x") => break,
                Some(_) => {}
                None => break,
            }
        }
    } else {
        sim.run_to_completion();
    }

    let summary = sim.summary();
    if session.json {
        return session.json(&summary);
    }
    writeln!(
        session.out,
        "Done! Served {} customer(s) and turned away {} in {} minute(s)",
        summary.served, summary.turned_away, summary.steps
    )?;
    Ok(())
}

fn schedule_report<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    schedule: &Schedule,
    report: ScheduleReport,
    query: Option<String>,
) -> Result<()> {
    let text = schedule.text();
    match report {
        ScheduleReport::Subjects => {
            let report = schedule::count_subjects(text);
            log::info!(
                "{} sections, {} duplicate lines, {} rejected lines",
                report.total_sections,
                report.duplicates,
                report.rejected
            );
            if session.json {
                return session.json(&report);
            }
            for subject in &report.subjects {
                writeln!(
                    session.out,
                    "{}, {} section(s)",
                    subject.subject, subject.sections
                )?;
            }
        }
        ScheduleReport::Courses => {
            let subjects = schedule::count_courses(text);
            if session.json {
                return session.json(&subjects);
            }
            for subject in &subjects {
                writeln!(
                    session.out,
                    "{}, {} course(s)",
                    subject.subject,
                    subject.courses.len()
                )?;
                for course in &subject.courses {
                    writeln!(
                        session.out,
                        "    {}, {} section(s)",
                        course.course, course.sections
                    )?;
                }
            }
        }
        ScheduleReport::Conflicts => {
            let conflicts = schedule::find_conflicts(text);
            if session.json {
                return session.json(&conflicts);
            }
            if conflicts.is_empty() {
                writeln!(session.out, "No conflicts found")?;
            }
            for c in &conflicts {
                writeln!(
                    session.out,
                    "Course conflict: {} ({}) conflicts with {} in {}",
                    c.course, c.section, c.conflicts_with, c.term
                )?;
            }
        }
        ScheduleReport::Search => search(session, &CourseIndex::build(text), query)?,
        // Streams the file instead, see `run`.
        ScheduleReport::Stats => {}
    }
    Ok(())
}

fn search<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    index: &CourseIndex<'_>,
    mut query: Option<String>,
) -> Result<()> {
    let once = query.is_some();
    loop {
        let query = match query.take() {
            Some(q) => q,
            None => match session.prompt("\nEnter course name [LIST, or X to quit]: ")? {
                Some(q) => q,
                None => return Ok(()),
            },
        };
        if query.eq_ignore_ascii_case("x") || query.eq_ignore_ascii_case("quit") {
            return Ok(());
        }
        if query.eq_ignore_ascii_case("list") {
            let names = index.names();
            if session.json {
                session.json(&names)?;
            } else {
                writeln!(session.out, "{}", names.join(", "))?;
            }
        } else {
            let hits = index.search(&query);
            if session.json {
                session.json(&hits)?;
            } else if hits.is_empty() {
                writeln!(session.out, "No course matches '{}'", query)?;
            } else {
                for hit in &hits {
                    writeln!(
                        session.out,
                        "{} was last offered in {}",
                        hit.course, hit.term
                    )?;
                }
            }
        }
        if once {
            return Ok(());
        }
    }
}

fn sort_bench<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    args: &SortBenchArgs,
) -> Result<()> {
    let algorithm = SortAlgorithm::from(args.algorithm);
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let rows = doubling_table(algorithm, args.start, args.rounds, &mut rng);
    if session.json {
        return session.json(&rows);
    }

    writeln!(session.out, "{:?} sort runtimes:", algorithm)?;
    for row in &rows {
        write!(
            session.out,
            "sorted {:>6} items in {:>8.3} ms / run  expected ",
            row.n, row.millis
        )?;
        match row.expected_millis {
            Some(expected) => writeln!(session.out, "{:.3}", expected)?,
            None => writeln!(session.out, "{}", algorithm.complexity())?,
        }
    }
    Ok(())
}

fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
}

#[derive(Debug, Serialize)]
struct StoredValue {
    index: usize,
    value: f64,
}

fn print_stored<R: BufRead, W: Write>(
    session: &mut Session<R, W>,
    values: &SortableArray<Option<f64>>,
) -> Result<()> {
    let stored: Vec<StoredValue> = values
        .iter()
        .enumerate()
        .filter_map(|(index, v)| v.map(|value| StoredValue { index, value }))
        .collect();
    if session.json {
        return session.json(&stored);
    }
    let listing: Vec<String> = stored
        .iter()
        .map(|s| format!("{} => {}", s.index, s.value))
        .collect();
    writeln!(session.out, "{}", listing.join(", "))?;
    Ok(())
}

/// Reads `index value` pairs into a sparse array, sorts a prefix of it on request, then answers
/// index lookups.
fn array<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let mut values: SortableArray<Option<f64>> = SortableArray::new();
    writeln!(session.out, "Enter index/value pairs [blank or Q to finish]")?;
    while let Some(line) = session.prompt("> ")? {
        if is_quit(&line) {
            break;
        }
        let mut fields = line.split_whitespace();
        let pair = match (fields.next(), fields.next(), fields.next()) {
            (Some(i), Some(v), None) => i.parse::<isize>().ok().zip(v.parse::<f64>().ok()),
            _ => None,
        };
        match pair {
            Some((i, _)) if i < 0 => writeln!(session.out, "Index {} is out of range", i)?,
            Some((i, v)) => values[i] = Some(v),
            None => writeln!(session.out, "Expected an index and a value, got '{}'", line)?,
        }
    }

    if !session.json {
        let unique = values.iter().filter(|v| v.is_some()).count();
        writeln!(session.out, "You entered {} unique value(s)", unique)?;
    }
    print_stored(session, &values)?;

    if let Some(count) = session.prompt("Enter number of values to sort [blank to skip]: ")? {
        match count.parse::<usize>() {
            Ok(n) => {
                values.sort(n);
                print_stored(session, &values)?;
            }
            Err(_) => writeln!(session.out, "Not a count: '{}'", count)?,
        }
    }

    loop {
        let Some(line) = session.prompt("Input an index to look up [blank or Q to quit]: ")?
        else {
            return Ok(());
        };
        if is_quit(&line) {
            return Ok(());
        }
        match line.parse::<isize>() {
            Ok(i) => match values[i] {
                Some(v) => writeln!(session.out, "Found it: the value stored at {} is {}", i, v)?,
                None => writeln!(session.out, "There is no value stored at {}", i)?,
            },
            Err(_) => writeln!(session.out, "Not an index: '{}'", line)?,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TableCommand {
    Quit,
    List,
    Capacity,
    Size,
    ShowLoadFactor,
    /// Percent, as typed.
    SetLoadFactor(f64),
    Display,
    Fill(usize, usize),
    Resize(usize),
    Reinsert,
    Clear,
    Delete(String),
    Set(String, String),
    Get(String),
}

impl TableCommand {
    fn parse(line: &str) -> Option<Self> {
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return None;
            }
            return Some(TableCommand::Set(key.to_string(), value.trim().to_string()));
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["q" | "quit"] => TableCommand::Quit,
            ["." | "list"] => TableCommand::List,
            ["capacity"] => TableCommand::Capacity,
            ["size" | "length"] => TableCommand::Size,
            ["lf"] => TableCommand::ShowLoadFactor,
            ["lf", percent] => TableCommand::SetLoadFactor(percent.parse().ok()?),
            ["display" | "info"] => TableCommand::Display,
            ["fill", a, b] => {
                let (a, b): (usize, usize) = (a.parse().ok()?, b.parse().ok()?);
                TableCommand::Fill(a.min(b), a.max(b))
            }
            ["resize", size] => TableCommand::Resize(size.parse().ok()?),
            ["reinsert"] => TableCommand::Reinsert,
            ["clear"] => TableCommand::Clear,
            ["del", key] => TableCommand::Delete(key.to_string()),
            [key] => TableCommand::Get(key.to_string()),
            _ => return None,
        };
        Some(command)
    }
}

/// A line-oriented shell over a `HashTable<String, String>`.
fn hashtable<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let mut table: HashTable<String, String> = HashTable::default();
    writeln!(
        session.out,
        "Commands: KEY = VALUE, KEY, del KEY, list, display, size, capacity, lf [PERCENT], \
         fill A B, resize N, reinsert, clear, q"
    )?;
    loop {
        let Some(line) = session.prompt("> ")? else {
            return Ok(());
        };
        let Some(command) = TableCommand::parse(&line) else {
            writeln!(session.out, "Unrecognized command '{}'", line)?;
            continue;
        };
        log::debug!("{:?}", command);
        match command {
            TableCommand::Quit => return Ok(()),
            TableCommand::List if session.json => {
                let entries: Vec<(&String, &String)> = table.iter().collect();
                session.json(&entries)?;
            }
            TableCommand::List => {
                let entries: Vec<String> =
                    table.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
                if entries.is_empty() {
                    writeln!(session.out, "[]")?;
                } else {
                    writeln!(session.out, "[ {} ]", entries.join(", "))?;
                }
            }
            TableCommand::Capacity => writeln!(session.out, "{}", table.capacity())?,
            TableCommand::Size => writeln!(session.out, "{}", table.len())?,
            TableCommand::ShowLoadFactor => {
                writeln!(session.out, "load factor = {}", table.load_factor())?
            }
            TableCommand::SetLoadFactor(percent) => {
                table.set_load_factor(percent / 100.0);
                writeln!(session.out, "Set load factor = {}", table.load_factor())?;
            }
            TableCommand::Display => writeln!(session.out, "{}", table)?,
            TableCommand::Fill(a, b) => {
                writeln!(session.out, "Filling range {} to {}", a, b)?;
                for n in a..b {
                    table.insert(n.to_string(), n.to_string());
                }
            }
            TableCommand::Resize(size) => {
                writeln!(
                    session.out,
                    "Resizing to {} (current size {})",
                    size,
                    table.len()
                )?;
                table.resize(size);
            }
            TableCommand::Reinsert => {
                table.reinsert();
                writeln!(session.out, "{}", table)?;
            }
            TableCommand::Clear => table.clear(),
            TableCommand::Delete(key) => match table.remove(&key) {
                Some(_) => writeln!(session.out, "deleted {}", key)?,
                None => writeln!(session.out, "missing key {}", key)?,
            },
            TableCommand::Set(key, value) => {
                writeln!(session.out, "{} = {}", key, value)?;
                table.insert(key, value);
            }
            TableCommand::Get(key) => match table.get(&key) {
                Some(value) => writeln!(session.out, "{}", value)?,
                None => writeln!(session.out, "undefined")?,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const ROADS: &str = "\
San Francisco
Oakland
12
----------
Oakland
Concord
25
----------
Concord
Walnut Creek
7
----------
";

    const SCHEDULE: &str = "\
Term\tSection\tCourse\tInstructor\tWhen
Fall 2016\t1001\tCOMSC-210\tBurns\tMW
Spring 2017\t1001\tCOMSC-210\tBurns\tMW
Fall 2016\t1001\tMATH-192\tSmith\tTTH
";

    fn session(input: &str, json: bool) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), json)
    }

    fn output(session: Session<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(session.out).unwrap()
    }

    #[test]
    fn traverse_prompts_until_blank() {
        let graph = RoadGraph::parse(ROADS).unwrap();
        let mut s = session("Oakland\nReno\nConcord\n\n", false);
        traverse(&mut s, &graph, TraversalOrder::Bfs, None).unwrap();
        let out = output(s);
        assert!(out.contains("BFS-Oakland-San Francisco-Concord-Walnut Creek\n"));
        assert!(out.contains("unknown city 'Reno'\n"));
        assert!(out.contains("BFS-Concord-Oakland-Walnut Creek-San Francisco\n"));
    }

    #[test]
    fn traverse_ignores_road_costs() {
        let path = std::env::temp_dir().join(format!("comp220-far-{}.txt", std::process::id()));
        std::fs::write(&path, "Oakland\nConcord\nfar\n---\nConcord\nWalnut Creek\n\n---\n")
            .unwrap();
        let mut s = session("", false);
        let result = run(
            Commands::Traverse {
                order: TraversalOrder::Dfs,
                cities: crate::cli::CitiesArgs { path: path.clone() },
                start: Some("Oakland".into()),
            },
            &mut s,
        );
        let _ = std::fs::remove_file(&path);
        result.unwrap();
        assert!(output(s).contains("DFS-Oakland-Concord-Walnut Creek\n"));
    }

    #[test]
    fn traverse_unknown_start_is_an_error() {
        let graph = RoadGraph::parse(ROADS).unwrap();
        let mut s = session("", false);
        let result = traverse(&mut s, &graph, TraversalOrder::Dfs, Some("Reno".into()));
        assert!(matches!(result, Err(Error::UnknownCity(_))));
    }

    #[test]
    fn route_from_args() {
        let graph = RoadGraph::parse(ROADS).unwrap();
        let mut s = session("", false);
        route(
            &mut s,
            &graph,
            RouteMode::Cheapest,
            Some("San Francisco".into()),
            Some("Walnut Creek".into()),
        )
        .unwrap();
        assert_eq!(
            output(s),
            "Total miles: 44-San Francisco-Oakland-Concord-Walnut Creek\n"
        );

        let mut s = session("", true);
        route(
            &mut s,
            &graph,
            RouteMode::Shortest,
            Some("Oakland".into()),
            Some("Concord".into()),
        )
        .unwrap();
        let report: serde_json::Value = serde_json::from_str(&output(s)).unwrap();
        assert_eq!(report["cost"], 1.0);
        assert_eq!(report["cities"][1], "Concord");
    }

    #[test]
    fn rpn_session() {
        let mut s = session("3 4 + top\n1.2.3\n2 * disp\nq\n5 top\n", false);
        rpn(&mut s).unwrap();
        let out = output(s);
        let lines: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(lines[0], "7");
        assert!(lines[1].contains("1.2.3"));
        assert_eq!(lines[2], "14");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn simulation_summary() {
        let mut s = session("", true);
        simulate(&mut s, ServerConfig::default(), Some(7), false).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&output(s)).unwrap();
        assert!(summary["served"].as_u64().unwrap() > 0);
    }

    #[test]
    fn interactive_simulation_quits_on_x() {
        let mut s = session("\nx\n", false);
        simulate(&mut s, ServerConfig::default(), Some(7), true).unwrap();
        let out = output(s);
        assert!(out.contains("Time: 1\n"));
        assert!(out.contains("Time: 2\n"));
        assert!(!out.contains("Time: 3\n"));
        assert!(out.contains("Done!"));
    }

    #[test]
    fn schedule_reports() {
        let schedule = Schedule::parse_str(SCHEDULE);
        let mut s = session("", false);
        schedule_report(&mut s, &schedule, ScheduleReport::Courses, None).unwrap();
        schedule_report(&mut s, &schedule, ScheduleReport::Conflicts, None).unwrap();
        let out = output(s);
        assert!(out.contains("COMSC, 1 course(s)\n    COMSC-210, 2 section(s)\n"));
        assert!(out.contains("Course conflict: MATH-192 (1001) conflicts with COMSC-210 in Fall 2016"));
    }

    #[test]
    fn search_loop() {
        let schedule = Schedule::parse_str(SCHEDULE);
        let index = CourseIndex::build(schedule.text());
        let mut s = session("list\ncomsc\nART\nX\nMATH\n", false);
        search(&mut s, &index, None).unwrap();
        let out = output(s);
        assert!(out.contains("COMSC-210, MATH-192\n"));
        assert!(out.contains("COMSC-210 was last offered in Spring 2017\n"));
        assert!(out.contains("No course matches 'ART'\n"));
        assert!(!out.contains("MATH-192 was last offered"));
    }

    #[test]
    fn array_session() {
        let mut s = session("3 1.5\n0 -2\n3 4.5\nfoo\n-1 9\nq\n4\n2\n0\nx\n7\nQ\n1\n", false);
        array(&mut s).unwrap();
        let out = output(s);
        assert!(out.contains("Expected an index and a value, got 'foo'\n"));
        assert!(out.contains("Index -1 is out of range\n"));
        assert!(out.contains("You entered 2 unique value(s)\n0 => -2, 3 => 4.5\n"));
        // Empty slots sort ahead of stored values.
        assert!(out.contains("2 => -2, 3 => 4.5\n"));
        assert!(out.contains("Found it: the value stored at 2 is -2\n"));
        assert!(out.contains("There is no value stored at 0\n"));
        assert!(out.contains("Not an index: 'x'\n"));
        assert!(out.contains("There is no value stored at 7\n"));
        assert!(!out.contains("stored at 1\n"));
    }

    #[test]
    fn array_session_json() {
        let mut s = session("1 2.5\n\n\n", true);
        array(&mut s).unwrap();
        let out = output(s);
        let start = out.find("[\n").unwrap();
        let end = out.find("\n]").unwrap() + 1;
        let stored: serde_json::Value = serde_json::from_str(&out[start..=end]).unwrap();
        assert_eq!(stored[0]["index"], 1);
        assert_eq!(stored[0]["value"], 2.5);
    }

    #[test]
    fn table_commands() {
        assert_eq!(
            TableCommand::parse("name=value"),
            Some(TableCommand::Set("name".into(), "value".into()))
        );
        assert_eq!(TableCommand::parse("fill 9 2"), Some(TableCommand::Fill(2, 9)));
        assert_eq!(TableCommand::parse("lf 50"), Some(TableCommand::SetLoadFactor(50.0)));
        assert_eq!(TableCommand::parse("del k"), Some(TableCommand::Delete("k".into())));
        assert_eq!(TableCommand::parse("k"), Some(TableCommand::Get("k".into())));
        assert_eq!(TableCommand::parse("resize many"), None);
        assert_eq!(TableCommand::parse("two words = v"), None);
        assert_eq!(TableCommand::parse("a b c d"), None);
    }

    #[test]
    fn hashtable_session() {
        let script = "a = 1\nb=2\na\nzz\nfill 0 3\nsize\ndel a\ndel a\nlf 50\n\
                      what is this\nb\nclear\nlist\nq\nsize\n";
        let mut s = session(script, false);
        hashtable(&mut s).unwrap();
        let out = output(s);
        let replies: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|l| l.trim_start_matches("> "))
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(
            replies,
            [
                "a = 1",
                "b = 2",
                "1",
                "undefined",
                "Filling range 0 to 3",
                "5",
                "deleted a",
                "missing key a",
                "Set load factor = 0.5",
                "Unrecognized command 'what is this'",
                "2",
                "[]",
            ]
        );
        assert!(out.ends_with("[]\n> "));
    }

    #[test]
    fn sort_bench_rows() {
        let mut s = session("", false);
        let args = SortBenchArgs {
            start: 8,
            rounds: 3,
            algorithm: crate::cli::SortChoice::Quick,
            seed: Some(1),
        };
        sort_bench(&mut s, &args).unwrap();
        let out = output(s);
        assert!(out.starts_with("Quick sort runtimes:\n"));
        assert!(out.contains("expected O(n log n)\n"));
        assert_eq!(out.lines().count(), 4);
    }
}
