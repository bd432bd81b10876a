use std::{
    fmt,
    io::{self, Write},
    net::{TcpListener, TcpStream},
};

use clap::{Parser, Subcommand};
use gdbstub::{
    common::Signal,
    conn::Connection,
    stub::{
        GdbStub, SingleThreadStopReason,
        run_blocking::{BlockingEventLoop, Event, WaitForStopReasonError},
    },
    target::Target,
};
use log::info;
use lxproc::{config::ImageArgs, debugger::Debugger, reports::Command};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Opt {
    #[command(flatten)]
    image: ImageArgs,
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Serve the image to GDB; reports are available as `monitor` commands
    Serve {
        #[arg(long, default_value_t = 9001)]
        port: u16,
    },
    #[command(flatten)]
    Report(Command),
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Opt { image, action } = opt;
    let image = image.open()?;

    match action {
        Action::Serve { port } => {
            let mut debugger = Debugger::new(image);
            let conn = wait_for_tcp(port)?;
            let gdbstub = GdbStub::new(conn);
            let reason = gdbstub.run_blocking::<GdbEventLoop>(&mut debugger)?;
            info!("GDB session ended: {reason:?}");
        }
        Action::Report(command) => command.run(&image, &mut StdoutSink(io::stdout().lock()))?,
    }

    Ok(())
}

/// Writes report lines straight through, so lines printed before a failure
/// stay visible.
struct StdoutSink<W>(W);

impl<W: Write> fmt::Write for StdoutSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

enum GdbEventLoop {}

impl BlockingEventLoop for GdbEventLoop {
    type Target = Debugger;
    type Connection = TcpStream;
    type StopReason = SingleThreadStopReason<u64>;

    fn wait_for_stop_reason(
        _target: &mut Self::Target,
        _conn: &mut Self::Connection,
    ) -> Result<
        Event<Self::StopReason>,
        WaitForStopReasonError<
            <Self::Target as Target>::Error,
            <Self::Connection as Connection>::Error,
        >,
    > {
        Err(WaitForStopReasonError::Target(anyhow::anyhow!(
            "a kernel image cannot be resumed"
        )))
    }

    fn on_interrupt(
        _target: &mut Self::Target,
    ) -> Result<Option<Self::StopReason>, <Self::Target as Target>::Error> {
        Ok(Some(SingleThreadStopReason::Signal(Signal::SIGINT)))
    }
}

fn wait_for_tcp(port: u16) -> anyhow::Result<TcpStream> {
    let sockaddr = format!("127.0.0.1:{port}");
    info!("Waiting for a GDB connection on {sockaddr}...");

    let sock = TcpListener::bind(sockaddr)?;
    let (stream, addr) = sock.accept()?;
    info!("Debugger connected from {addr}");

    Ok(stream)
}
