use anyhow::{Context, anyhow};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use spiraid_rs::bus::host::Host;
use spiraid_rs::device::fram::Fram;
use spiraid_rs::error::BusError;
use spiraid_rs::layout::mapping::RaidMode;

use crate::cli::parse_u32;

/// Op is one host access; addresses are data region offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Read(u32),
    Write(u32, u32),
    Mode(Option<RaidMode>),
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Word(u32),
    Done,
    Mode(RaidMode),
    Status(u32),
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Word(w) => write!(f, "{w:#010x}"),
            Self::Done => f.write_str("ok"),
            Self::Mode(m) => write!(f, "mode {m} ({})", m.encoding()),
            Self::Status(s) => write!(f, "status {s:#x} (integrity_fault={})", s & 1),
        }
    }
}

struct Envelope {
    op: Op,
    reply: oneshot::Sender<Result<Reply, BusError>>,
}

/// ConsoleHandle submits ops to the task that owns the controller.
#[derive(Clone)]
pub struct ConsoleHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ConsoleHandle {
    /// Resolves when the bus acknowledges the op.
    pub async fn call(&self, op: Op) -> anyhow::Result<Result<Reply, BusError>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { op, reply })
            .await
            .map_err(|_| anyhow!("controller service stopped"))?;
        rx.await.context("controller service dropped the request")
    }
}

/// Moves `host` into a task that serves ops one at a time until shutdown.
/// The task hands the host back when it exits.
pub fn spawn_service(
    host: Host<Fram>,
    queue_cap: usize,
    shutdown: watch::Receiver<bool>,
) -> (ConsoleHandle, JoinHandle<Host<Fram>>) {
    let (tx, rx) = mpsc::channel(queue_cap.max(1));
    let task = tokio::spawn(serve(host, rx, shutdown));
    (ConsoleHandle { tx }, task)
}

async fn serve(
    mut host: Host<Fram>,
    mut rx: mpsc::Receiver<Envelope>,
    mut shutdown: watch::Receiver<bool>,
) -> Host<Fram> {
    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(Envelope { op, reply }) => {
                    let result = execute(&mut host, op);
                    debug!(?op, ?result, "console op served");
                    let _ = reply.send(result);
                }
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("controller service: shutdown");
                    break;
                }
            },
        }
    }
    host
}

pub fn execute(host: &mut Host<Fram>, op: Op) -> Result<Reply, BusError> {
    match op {
        Op::Read(offset) => host.read_data(offset).map(Reply::Word),
        Op::Write(offset, word) => host.write_data(offset, word).map(|()| Reply::Done),
        Op::Mode(Some(mode)) => host.set_mode(mode).map(|()| Reply::Done),
        Op::Mode(None) => host.mode().map(Reply::Mode),
        Op::Status => host.status().map(Reply::Status),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Op(Op),
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "commands: w <addr> <value> | r <addr> | mode [mirror|stripe|parity] | status | quit";

pub fn parse_line(line: &str) -> Result<Line, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(Line::Empty);
    };
    let mut number = |what: &str| -> Result<u32, String> {
        words
            .next()
            .ok_or_else(|| format!("missing {what}"))
            .and_then(parse_u32)
    };
    let line = match cmd {
        "r" | "read" => Line::Op(Op::Read(number("address")?)),
        "w" | "write" => {
            let addr = number("address")?;
            Line::Op(Op::Write(addr, number("value")?))
        }
        "mode" => match words.next() {
            Some(m) => Line::Op(Op::Mode(Some(m.parse()?))),
            None => Line::Op(Op::Mode(None)),
        },
        "status" => Line::Op(Op::Status),
        "help" | "?" => Line::Help,
        "q" | "quit" | "exit" => Line::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(line)
}

/// Reads commands from stdin until `quit`, end of input or ctrl-c.
pub async fn run_console(handle: ConsoleHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading console input")?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown: ctrl-c");
                None
            },
        };
        let Some(line) = line else {
            break;
        };
        match parse_line(&line) {
            Ok(Line::Op(op)) => match handle.call(op).await? {
                Ok(reply) => println!("{reply}"),
                Err(err) => println!("bus error: {err}"),
            },
            Ok(Line::Help) => println!("{HELP}"),
            Ok(Line::Quit) => break,
            Ok(Line::Empty) => {}
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}
