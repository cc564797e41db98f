//! sculldev Shell
//!
//! Line-oriented shell over a device set. Reads commands from stdin.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use bytes::BytesMut;
use clap::Parser;
use sculldev::transfer::IoSink;
use sculldev::{AccessMode, Config, DeviceHandle, DeviceSet, Geometry, Interrupt, ScullError};
use tracing_subscriber::{fmt, EnvFilter};

/// sculldev Shell
#[derive(Parser, Debug)]
#[command(name = "scull-shell")]
#[command(about = "Interactive shell over sparse in-memory byte devices")]
#[command(version)]
struct Args {
    /// Number of devices
    #[arg(short = 'n', long, default_value = "4")]
    devices: usize,

    /// Bytes per quantum buffer
    #[arg(short, long, default_value = "4000")]
    quantum: usize,

    /// Quantum slots per node
    #[arg(short = 's', long, default_value = "1000")]
    qset: usize,
}

const HELP: &str = "\
commands:
  open <dev> <r|w|rw>       open a device, prints a handle id
  close <h>                 release a handle
  seek <h> <pos>            set a handle's position
  write <h> <text>          write text at the handle's position
  read <h> <len>            one read call of up to <len> bytes
  cat <dev>                 dump a device from offset 0 until a short read
  trim <dev>                drop a device's contents
  geometry <dev> <q> <s>    reshape an empty device
  report                    show every device's layout
  help | quit";

struct Shell {
    devices: DeviceSet,
    handles: HashMap<usize, DeviceHandle>,
    next_handle: usize,
    intr: Interrupt,
}

impl Shell {
    fn new(devices: DeviceSet) -> Self {
        Self {
            devices,
            handles: HashMap::new(),
            next_handle: 1,
            intr: Interrupt::new(),
        }
    }

    fn execute(&mut self, words: &[&str], out: &mut impl Write) -> sculldev::Result<()> {
        match words {
            ["open", dev, mode] => {
                let mode = match *mode {
                    "r" => AccessMode::ReadOnly,
                    "w" => AccessMode::WriteOnly,
                    "rw" => AccessMode::ReadWrite,
                    other => return Err(ScullError::BadAccess(format!("unknown mode {}", other))),
                };
                let handle = self.devices.open(parse(dev)?, mode)?;
                let id = self.next_handle;
                self.next_handle += 1;
                self.handles.insert(id, handle);
                writeln!(out, "handle {}", id)?;
            }
            ["close", h] => {
                let handle = self.take_handle(parse(h)?)?;
                handle.release();
            }
            ["seek", h, pos] => {
                let pos = parse(pos)? as u64;
                self.handle(parse(h)?)?.set_position(pos);
            }
            ["write", h, rest @ ..] => {
                let text = rest.join(" ");
                let handle = self.handle(parse(h)?)?;
                handle.write_all_bytes(text.as_bytes())?;
                writeln!(out, "wrote {} bytes, position {}", text.len(), handle.position())?;
            }
            ["read", h, len] => {
                let handle = self.handle(parse(h)?)?;
                // One read call never returns more than a quantum
                let quantum = handle.device().geometry(handle.interrupt())?.quantum;
                let len = parse(len)?.min(quantum);
                let mut buf = BytesMut::with_capacity(len);
                let n = handle.read_to(len, &mut buf)?;
                writeln!(out, "{} bytes: {:?}", n, String::from_utf8_lossy(&buf))?;
            }
            ["cat", dev] => {
                let device = self.devices.get(parse(dev)?)?;
                let mut pos = 0u64;
                let mut sink = IoSink(&mut *out);
                while device.read(&mut pos, usize::MAX, &mut sink, &self.intr)? > 0 {}
                writeln!(out)?;
            }
            ["trim", dev] => {
                let stats = self.devices.get(parse(dev)?)?.trim(&self.intr)?;
                writeln!(
                    out,
                    "freed {} items, {} quanta ({} bytes)",
                    stats.nodes_freed, stats.quanta_freed, stats.size_before
                )?;
            }
            ["geometry", dev, quantum, qset] => {
                let geometry = Geometry::new(parse(quantum)?, parse(qset)?)?;
                self.devices.get(parse(dev)?)?.set_geometry(geometry, &self.intr)?;
            }
            ["report"] => {
                for report in self.devices.report(&self.intr)? {
                    write!(out, "{}", report)?;
                }
            }
            ["help"] => writeln!(out, "{}", HELP)?,
            _ => writeln!(out, "unknown command; try `help`")?,
        }
        Ok(())
    }

    fn handle(&mut self, id: usize) -> sculldev::Result<&mut DeviceHandle> {
        self.handles
            .get_mut(&id)
            .ok_or_else(|| ScullError::BadAccess(format!("no open handle {}", id)))
    }

    fn take_handle(&mut self, id: usize) -> sculldev::Result<DeviceHandle> {
        self.handles
            .remove(&id)
            .ok_or_else(|| ScullError::BadAccess(format!("no open handle {}", id)))
    }

    fn close(self) {
        for (_, handle) in self.handles {
            handle.release();
        }
        self.devices.close();
    }
}

fn parse(word: &str) -> sculldev::Result<usize> {
    word.parse()
        .map_err(|_| ScullError::Config(format!("expected a number, got {:?}", word)))
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sculldev=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("sculldev shell v{}", sculldev::VERSION);

    let config = Config::builder()
        .device_count(args.devices)
        .quantum(args.quantum)
        .qset(args.qset)
        .build();

    let devices = match DeviceSet::new(config) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Failed to create devices: {}", e);
            std::process::exit(1);
        }
    };

    let mut shell = Shell::new(devices);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("stdin error: {}", e);
                break;
            }
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if words == ["quit"] {
            break;
        }
        if let Err(e) = shell.execute(&words, &mut out) {
            let _ = writeln!(out, "error: {}", e);
        }
        let _ = out.flush();
    }

    shell.close();
    tracing::info!("Shell stopped");
}
