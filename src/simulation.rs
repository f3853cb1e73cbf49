use std::{cmp::Ordering, fmt, path::Path, str::FromStr};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::{constants::*, priority_queue::PriorityQueue, Error, Result};

/// The six tunables of a simulation run. On disk this is six whitespace-separated values in
/// field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub server_count: usize,
    /// Average customers arriving per minute.
    pub arrival_rate: f64,
    pub max_queue_length: usize,
    pub min_service_time: usize,
    pub max_service_time: usize,
    /// Minute at which customers stop arriving.
    pub arrival_end_time: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server_count: 4,
            arrival_rate: 2.5,
            max_queue_length: 8,
            min_service_time: 3,
            max_service_time: 10,
            arrival_end_time: 50,
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        text.parse()
    }

    /// Writes the default configuration to `path`, one value per line.
    pub fn write_setup(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, ServerConfig::default().to_file_string())
            .map_err(|e| Error::io(path, e))
    }

    pub fn to_file_string(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n",
            self.server_count,
            self.arrival_rate,
            self.max_queue_length,
            self.min_service_time,
            self.max_service_time,
            self.arrival_end_time
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_count == 0 {
            return Err(Error::InvalidConfig("at least one server is required".into()));
        }
        if self.min_service_time > self.max_service_time {
            return Err(Error::InvalidConfig(format!(
                "minimum service time {} exceeds maximum {}",
                self.min_service_time, self.max_service_time
            )));
        }
        if !self.arrival_rate.is_finite() || self.arrival_rate < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "arrival rate {} is not a non-negative number",
                self.arrival_rate
            )));
        }
        Ok(())
    }
}

fn field<T: FromStr>(value: Option<&str>, name: &str) -> Result<T> {
    let value = value.ok_or_else(|| Error::InvalidConfig(format!("missing {}", name)))?;
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("'{}' is not a valid {}", value, name)))
}

impl FromStr for ServerConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut values = s.split_whitespace();
        let config = ServerConfig {
            server_count: field(values.next(), "server count")?,
            arrival_rate: field(values.next(), "arrival rate")?,
            max_queue_length: field(values.next(), "maximum queue length")?,
            min_service_time: field(values.next(), "minimum service time")?,
            max_service_time: field(values.next(), "maximum service time")?,
            arrival_end_time: field(values.next(), "arrival end time")?,
        };
        if values.next().is_some() {
            log::warn!("ignoring trailing values in simulation config");
        }
        Ok(config)
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of servers: {:>6}", self.server_count)?;
        writeln!(
            f,
            "customer arrival rate: {:>2} per minute, for {} minutes",
            self.arrival_rate, self.arrival_end_time
        )?;
        writeln!(f, "maximum queue length: {:>3}", self.max_queue_length)?;
        writeln!(f, "minimum service time: {:>3}", self.min_service_time)?;
        writeln!(f, "maximum service time: {:>3}", self.max_service_time)
    }
}

/// A waiting customer. Ids cycle through `A..=Z`; `order` is unique and earlier customers get
/// served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer {
    pub id: char,
    pub order: usize,
}

impl Customer {
    pub fn new(order: usize) -> Self {
        Customer {
            id: char::from(b'A' + (order % 26) as u8),
            order,
        }
    }
}

impl Ord for Customer {
    fn cmp(&self, other: &Self) -> Ordering {
        other.order.cmp(&self.order)
    }
}

impl PartialOrd for Customer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A scheduled end of service. The earliest timestamp is the greatest so it sits on top of the
/// heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEvent {
    pub server: usize,
    pub timestamp: usize,
}

impl Ord for ServiceEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.server.cmp(&self.server))
    }
}

impl PartialOrd for ServiceEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event {{ server = {}, time = {} }}",
            self.server, self.timestamp
        )
    }
}

/// Number of events in one unit of time for a Poisson process with the given `rate`, found by
/// walking the CDF until it passes the uniform draw `u`. Capped at `MAX_ARRIVALS_PER_STEP`.
pub fn poisson_k(rate: f64, mut u: f64) -> usize {
    let mut p = (-rate).exp();
    let mut k = 0;
    while u > p && k < MAX_ARRIVALS_PER_STEP {
        u -= p;
        k += 1;
        p *= rate / k as f64;
    }
    k
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub served: usize,
    pub turned_away: usize,
    pub steps: usize,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: ServerConfig,
    servers: Vec<Option<Customer>>,
    event_queue: PriorityQueue<ServiceEvent>,
    wait_queue: PriorityQueue<Customer>,
    next_order: usize,
    time: usize,
    running: bool,
    rng: ChaCha8Rng,
    summary: Summary,
}

impl Simulation {
    /// Validates `config` and sets up idle servers. Without a seed the RNG is seeded from the OS.
    pub fn new(config: ServerConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Simulation {
            servers: vec![None; config.server_count],
            config,
            event_queue: PriorityQueue::new(),
            wait_queue: PriorityQueue::new(),
            next_order: 0,
            time: 0,
            running: true,
            rng,
            summary: Summary::default(),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn time(&self) -> usize {
        self.time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn busy_servers(&self) -> usize {
        self.servers.iter().filter(|s| s.is_some()).count()
    }

    pub fn waiting(&self) -> usize {
        self.wait_queue.len()
    }

    /// Advances the simulation by one minute.
    pub fn step(&mut self) {
        if self.time < self.config.arrival_end_time {
            let arrivals = poisson_k(self.config.arrival_rate, self.rng.gen::<f64>());
            for _ in 0..arrivals {
                if self.wait_queue.len() < self.config.max_queue_length {
                    self.wait_queue.push(Customer::new(self.next_order));
                    self.next_order += 1;
                } else {
                    self.summary.turned_away += 1;
                }
            }
        }

        while let Some(event) = self.event_queue.peek() {
            if event.timestamp > self.time {
                break;
            }
            let server = event.server;
            self.event_queue.pop();
            self.servers[server] = None;
        }

        for server in 0..self.servers.len() {
            if self.servers[server].is_some() {
                continue;
            }
            let Some(customer) = self.wait_queue.pop() else {
                break;
            };
            let delay = self
                .rng
                .gen_range(self.config.min_service_time..=self.config.max_service_time)
                .max(1);
            self.event_queue.push(ServiceEvent {
                server,
                timestamp: self.time + delay,
            });
            self.servers[server] = Some(customer);
            self.summary.served += 1;
        }

        let busy = self.busy_servers();
        self.running = self.time < self.config.arrival_end_time || busy > 0;
        log::debug!(
            "t={} busy={} waiting={} turned_away={}",
            self.time,
            busy,
            self.wait_queue.len(),
            self.summary.turned_away
        );
        self.time += 1;
        self.summary.steps += 1;
    }

    pub fn run_to_completion(&mut self) -> Summary {
        while self.running {
            self.step();
        }
        self.summary
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time: {}", self.time)?;
        writeln!(f, "-----------------------------")?;
        writeln!(f, "server now-serving wait-queue")?;
        writeln!(f, "------ ----------- ----------")?;
        for (i, server) in self.servers.iter().enumerate() {
            write!(f, "{:>3}{:>7}", i, server.map_or('-', |c| c.id))?;
            if i == 0 && !self.wait_queue.is_empty() {
                let waiting: String = self
                    .wait_queue
                    .clone()
                    .into_sorted_vec()
                    .iter()
                    .rev()
                    .map(|c| c.id)
                    .collect();
                write!(f, "{:>11}{}", "", waiting)?;
            }
            writeln!(f)?;
        }
        match self.event_queue.peek() {
            None => writeln!(f, "No scheduled end-of-service events at this time")?,
            Some(next) => {
                writeln!(
                    f,
                    "Next scheduled end-of-service event in {} minute(s)",
                    next.timestamp.saturating_sub(self.time)
                )?;
                writeln!(f, "End-of-service events: ")?;
                let mut events = self.event_queue.clone();
                while let Some(event) = events.pop() {
                    let id = self.servers[event.server].map_or('-', |c| c.id);
                    writeln!(
                        f,
                        "   {} in {} minute(s)",
                        id,
                        event.timestamp.saturating_sub(self.time)
                    )?;
                }
            }
        }
        write!(f, "-----------------------------")
    }
}
