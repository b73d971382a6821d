use tracing::{debug, trace};

use crate::error::EngineError;
use crate::hooks::{ByteIo, Streams};
use crate::tape::Tape;

const LESS: u8 = b'<';
const GREATER: u8 = b'>';
const MINUS: u8 = b'-';
const PLUS: u8 = b'+';
const DOT: u8 = b'.';
const COMMA: u8 = b',';
const LBRACKET: u8 = b'[';
const RBRACKET: u8 = b']';

/// What `,` stores when the read hook reports end of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EofBehavior {
    /// Store 255, the classic `getchar` EOF truncated to one byte.
    #[default]
    MaxByte,
    /// Store 0.
    Zero,
    /// Leave the current cell untouched.
    Unchanged,
}

/// Configuration for one engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub eof: EofBehavior,
}

/// Counters gathered during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Non-whitespace characters dispatched, loop openings included.
    pub instructions: u64,
    /// Times a loop body was entered.
    pub loop_iterations: u64,
}

/// Executes scripts against a fresh tape.
///
/// The engine is the execution context: the tape (cells and pointer) and
/// the I/O hooks live here, and every nested loop body runs through a
/// frame of the same engine. Pointer moves and cell writes
/// made inside a body are therefore what the enclosing loop's zero test
/// sees, and what runs after the loop starts from.
///
/// A loop whose body never clears its cell runs forever.
pub struct Engine<I> {
    tape: Tape,
    io: I,
    config: EngineConfig,
    stats: RunStats,
}

impl<I: ByteIo> Engine<I> {
    pub fn new(io: I) -> Self {
        Self::with_config(io, EngineConfig::default())
    }

    pub fn with_config(io: I, config: EngineConfig) -> Self {
        Self {
            tape: Tape::new(),
            io,
            config,
            stats: RunStats::default(),
        }
    }

    /// Run `script` as one top-level block.
    ///
    /// Output is flushed when the run ends, whether or not it succeeded.
    /// The first error anywhere, nested loop bodies included, aborts the
    /// whole run.
    pub fn run(&mut self, script: &[u8]) -> Result<RunStats, EngineError> {
        debug!(len = script.len(), eof = ?self.config.eof, "run started");
        self.stats = RunStats::default();

        let result = self.execute(script);
        let flushed = self.io.flush();
        result?;
        flushed?;

        debug!(
            instructions = self.stats.instructions,
            loop_iterations = self.stats.loop_iterations,
            pointer = self.tape.pointer(),
            "run finished"
        );
        Ok(self.stats)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_io(self) -> I {
        self.io
    }

    /// Execute the whole script.
    ///
    /// Loop bodies are frames on an explicit stack rather than native
    /// calls, so bracket nesting depth is limited only by memory.
    fn execute(&mut self, script: &[u8]) -> Result<(), EngineError> {
        let bracket_match = build_bracket_table(script);
        let mut frames = vec![Frame {
            start: 0,
            end: script.len(),
            cnt: 0,
            is_loop: false,
        }];

        while let Some(frame) = frames.last_mut() {
            if frame.cnt >= frame.end {
                // End of a body: test the cell again, like the loop head would.
                if frame.is_loop && self.tape.get() != 0 {
                    self.stats.loop_iterations += 1;
                    frame.cnt = frame.start;
                } else {
                    frames.pop();
                }
                continue;
            }

            let offset = frame.cnt;
            let cur = script[offset];
            frame.cnt += 1;

            if is_whitespace(cur) {
                continue;
            }
            self.stats.instructions += 1;

            match cur {
                GREATER => self.tape.advance()?,
                LESS => self.tape.retreat()?,
                PLUS => self.tape.increment(),
                MINUS => self.tape.decrement(),
                DOT => self.io.emit(self.tape.get())?,
                COMMA => self.input()?,
                LBRACKET => {
                    let close = bracket_match[offset];
                    if close == usize::MAX || close >= frame.end {
                        return Err(EngineError::UnmatchedOpen { offset });
                    }
                    frame.cnt = close + 1;
                    trace!(offset, body_len = close - offset - 1, "entering loop");
                    if self.tape.get() != 0 {
                        self.stats.loop_iterations += 1;
                        frames.push(Frame {
                            start: offset + 1,
                            end: close,
                            cnt: offset + 1,
                            is_loop: true,
                        });
                    }
                }
                // Every legitimate ']' is skipped over by its '[' above.
                RBRACKET => return Err(EngineError::UnmatchedClose { offset }),
                byte => return Err(EngineError::IllegalCharacter { byte, offset }),
            }
        }
        Ok(())
    }

    fn input(&mut self) -> Result<(), EngineError> {
        match self.io.read()? {
            Some(byte) => self.tape.set(byte),
            None => match self.config.eof {
                EofBehavior::MaxByte => self.tape.set(u8::MAX),
                EofBehavior::Zero => self.tape.set(0),
                EofBehavior::Unchanged => {}
            },
        }
        Ok(())
    }
}

/// A block being executed: the whole script, or one pass of a loop body.
/// All positions are absolute offsets into the script.
struct Frame {
    start: usize,
    end: usize,
    cnt: usize,
    is_loop: bool,
}

#[inline(always)]
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C)
}

/// Build a bracket-match lookup table for the script.
///
/// `result[i]` is the index of the `]` closing the `[` at `i`, the first
/// position after `i` where nesting depth returns to zero. It is
/// `usize::MAX` for unmatched `[` and for every other position. A `]`
/// with nothing open is skipped, as a forward scan from any later `[`
/// never sees it.
fn build_bracket_table(script: &[u8]) -> Vec<usize> {
    let mut table = vec![usize::MAX; script.len()];
    let mut stack = Vec::new();

    for (i, &b) in script.iter().enumerate() {
        match b {
            LBRACKET => stack.push(i),
            RBRACKET => {
                if let Some(open) = stack.pop() {
                    table[open] = i;
                }
            }
            _ => {}
        }
    }

    table
}

/// Run `script` with injected hooks and configuration.
pub fn run_with<I: ByteIo>(
    script: &[u8],
    io: I,
    config: EngineConfig,
) -> Result<RunStats, EngineError> {
    Engine::with_config(io, config).run(script)
}

/// Run `script` over standard input and output with the default
/// configuration and return a status code: `0` on success, otherwise the
/// error's [`EngineError::status`]. The error message goes to standard
/// error.
pub fn run(script: &[u8]) -> i32 {
    match run_with(script, Streams::stdio(), EngineConfig::default()) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{e}");
            e.status()
        }
    }
}
