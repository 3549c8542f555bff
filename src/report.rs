//! Reporting of accepted search nodes.
//!
//! Searches hand every node they accept to an `ExpansionSink`. Sinks only
//! observe; nothing they do feeds back into the search.

use std::io::Write;

use crate::cost::Cost;
use crate::space::State;

/// A node accepted by a search, in the order it was accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Expansion<St, C>
where
    St: State,
    C: Cost,
{
    pub state: St,
    pub g: C,
    pub h: C,
    /// 1-based position in the expansion order.
    pub index: usize,
}

impl<St, C> Expansion<St, C>
where
    St: State,
    C: Cost,
{
    pub fn f(&self) -> C {
        self.g.saturating_add(&self.h)
    }
}

pub trait ExpansionSink<St, C>
where
    St: State,
    C: Cost,
{
    fn report(&mut self, expansion: &Expansion<St, C>);
}

/// Discards everything.
impl<St, C> ExpansionSink<St, C> for ()
where
    St: State,
    C: Cost,
{
    fn report(&mut self, _expansion: &Expansion<St, C>) {}
}

/// Records every expansion.
impl<St, C> ExpansionSink<St, C> for Vec<Expansion<St, C>>
where
    St: State,
    C: Cost,
{
    fn report(&mut self, expansion: &Expansion<St, C>) {
        self.push(*expansion);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<St, C, F> ExpansionSink<St, C> for FnSink<F>
where
    St: State,
    C: Cost,
    F: FnMut(&Expansion<St, C>),
{
    fn report(&mut self, expansion: &Expansion<St, C>) {
        (self.0)(expansion)
    }
}

/// Prints expansions as
///
/// ```text
/// 1 6 2
/// 5 7 8
/// - 4 3
/// 0 | 25
///  #1
///
/// ```
///
/// The State's `Display` draws the board. Write errors can't stop a search,
/// so the first one is kept and handed back by `finish`.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    out: W,
    error: Option<std::io::Error>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn write_expansion<St, C>(&mut self, e: &Expansion<St, C>) -> std::io::Result<()>
    where
        St: State + std::fmt::Display,
        C: Cost,
    {
        writeln!(self.out, "{}", e.state)?;
        writeln!(self.out, "{} | {}", e.g, e.h)?;
        writeln!(self.out, " #{}\n", e.index)
    }

    /// Flushes the output and returns it, or the first error seen.
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W, St, C> ExpansionSink<St, C> for WriterSink<W>
where
    W: Write,
    St: State + std::fmt::Display,
    C: Cost,
{
    fn report(&mut self, expansion: &Expansion<St, C>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_expansion(expansion) {
            log::warn!("Stopped reporting expansions: {e}");
            self.error = Some(e);
        }
    }
}
