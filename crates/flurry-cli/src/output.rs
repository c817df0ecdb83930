use std::io::{self, Write};

use flurry::FlakeId;

use crate::config::Config;

/// Writes ids to `out`, one per line, and returns how many were written.
///
/// A `count` of zero drains `ids` until writing fails; the caller decides
/// which failures end the stream cleanly.
pub fn write_ids<W, I>(out: &mut W, ids: I, config: &Config) -> io::Result<u64>
where
    W: Write,
    I: IntoIterator<Item = FlakeId>,
{
    let ids = ids.into_iter();
    if config.count == 0 {
        write_all(out, ids, config.explain)
    } else {
        write_all(out, ids.take(clamp_count(config.count)), config.explain)
    }
}

fn write_all<W>(out: &mut W, ids: impl Iterator<Item = FlakeId>, explain: bool) -> io::Result<u64>
where
    W: Write,
{
    let mut written = 0;
    for id in ids {
        if explain {
            writeln!(
                out,
                "{id}\ttimestamp={} machine_id={} node_id={} sequence={}",
                id.timestamp(),
                id.machine_id(),
                id.node_id(),
                id.sequence()
            )?;
        } else {
            writeln!(out, "{id}")?;
        }
        written += 1;
    }
    Ok(written)
}

fn clamp_count(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use flurry::{FlakeGenerator, GeneratorOptions, OverflowMode};

    use super::*;

    fn config(count: u64, explain: bool) -> Config {
        Config {
            machine_id: 3,
            node_id: 2,
            count,
            overflow: OverflowMode::PerTick,
            epoch: Duration::ZERO,
            explain,
        }
    }

    fn run_fixed(config: &Config) -> String {
        let options = GeneratorOptions::new(|| 50_u64);
        let mut generator = FlakeGenerator::new(3, 2, options);
        let mut out = Vec::new();
        let written = write_ids(&mut out, generator.iter(), config).unwrap();
        assert_eq!(written, config.count);
        String::from_utf8(out).unwrap()
    }

    /// Accepts `limit` lines, then reports the reader as gone.
    struct ClosingPipe {
        lines: usize,
        limit: usize,
    }

    impl Write for ClosingPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.lines == self.limit {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            self.lines += buf.iter().filter(|&&b| b == b'\n').count();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prints_one_decimal_id_per_line() {
        let text = run_fixed(&config(3, false));
        assert_eq!(text, "210116608\n210116609\n210116610\n");
    }

    #[test]
    fn explain_breaks_down_fields() {
        let text = run_fixed(&config(2, true));
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("210116608\ttimestamp=50 machine_id=3 node_id=2 sequence=0")
        );
        assert_eq!(
            lines.next(),
            Some("210116609\ttimestamp=50 machine_id=3 node_id=2 sequence=1")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn zero_count_streams_until_the_reader_goes_away() {
        let mut generator = FlakeGenerator::new(0, 0, GeneratorOptions::default());
        let mut pipe = ClosingPipe { lines: 0, limit: 10 };
        let err = write_ids(&mut pipe, generator.iter(), &config(0, false)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(pipe.lines, 10);
    }
}
