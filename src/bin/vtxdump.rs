use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use byteorder::{ByteOrder, NativeEndian};
use flate2::read::DeflateDecoder;
use getopts::Options;

static BRIEF: &str = "Usage: vtxdump [options] <file>

Inflate a .vz or .ez file written by vtxremap and print it as plain text.";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match try_main(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: &[String]) -> anyhow::Result<()> {
    let mut opts = Options::new();
    opts.optflag("e", "edges", "The file is an edge list (implied by the .ez extension)");
    opts.optflag("w", "weighted", "Each edge carries a weight");
    opts.optflag("h", "help", "Show this help menu");

    let matches = opts.parse(args.iter().skip(1)).context("invalid command line")?;
    if matches.opt_present("help") || matches.free.len() != 1 {
        println!("{}", opts.usage(BRIEF));
        return Ok(());
    }

    let path = &matches.free[0];
    let weighted = matches.opt_present("weighted");
    let edges = weighted || matches.opt_present("edges") || path.ends_with(".ez");
    let slots = if !edges { 1 } else if weighted { 3 } else { 2 };

    let file = File::open(path).with_context(|| format!("cannot open {}", path))?;
    let mut input = DeflateDecoder::new(BufReader::new(file));
    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());

    let mut record = [0u64; 3];
    let mut count = 0u64;
    loop {
        match read_record(&mut input, &mut record[..slots])? {
            Record::End => break,
            Record::Truncated => bail!("{}: truncated record after {} entries", path, count),
            Record::Full => {}
        }
        match slots {
            1 => writeln!(output, "{}", record[0])?,
            2 => writeln!(output, "{} {}", record[0], record[1])?,
            _ => writeln!(output, "{} {} {}", record[0], record[1], f64::from_bits(record[2]))?,
        }
        count += 1;
    }
    output.flush()?;
    Ok(())
}

enum Record { Full, End, Truncated }

fn read_record<R: Read>(input: &mut R, record: &mut [u64]) -> io::Result<Record> {
    let mut bytes = [0u8; 8];
    for (index, slot) in record.iter_mut().enumerate() {
        let mut filled = 0;
        while filled < bytes.len() {
            match input.read(&mut bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        if filled < bytes.len() {
            return Ok(if index == 0 && filled == 0 { Record::End } else { Record::Truncated });
        }
        *slot = NativeEndian::read_u64(&bytes);
    }
    Ok(Record::Full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(values: &[u64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn reads_whole_records() {
        let data = bytes(&[1, 2, 3, 4]);
        let mut input = &data[..];
        let mut record = [0u64; 2];
        assert!(matches!(read_record(&mut input, &mut record).unwrap(), Record::Full));
        assert_eq!(record, [1, 2]);
        assert!(matches!(read_record(&mut input, &mut record).unwrap(), Record::Full));
        assert_eq!(record, [3, 4]);
        assert!(matches!(read_record(&mut input, &mut record).unwrap(), Record::End));
    }

    #[test]
    fn detects_truncation() {
        let data = bytes(&[1, 2, 3]);
        let mut input = &data[..];
        let mut record = [0u64; 2];
        assert!(matches!(read_record(&mut input, &mut record).unwrap(), Record::Full));
        assert!(matches!(read_record(&mut input, &mut record).unwrap(), Record::Truncated));

        let data = vec![0u8; 5];
        let mut input = &data[..];
        let mut record = [0u64; 1];
        assert!(matches!(read_record(&mut input, &mut record).unwrap(), Record::Truncated));
    }
}
