//! `ace_ari`: transcodes one ARI per input line between text and CBOR form.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use ari_codec::cbor::CborCodecOptions;
use ari_codec::text::TextCodecOptions;
use ari_codec::{cbor, text, Ari, Catalog};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Form {
    Text,
    Cbor,
    Cborhex,
}

/// Transcode ARIs between text and CBOR form, one per input line.
#[derive(Clone, Debug, Parser)]
struct Args {
    /// input form
    #[arg(long, value_enum, default_value = "text")]
    inform: Form,
    /// output form
    #[arg(long, value_enum, default_value = "text")]
    outform: Form,
    /// force object references to emit in enum (nicknamed) form
    #[arg(long)]
    must_nickname: bool,
    /// force literal values to resolve strictly against the catalog
    #[arg(long)]
    must_typed: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let catalog = Catalog::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // The first failure terminates: propagating the first `Err` out of
    // `main` via `?` both stops processing and exits nonzero.
    for (lineno, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading input line")?;
        if line.trim().is_empty() {
            continue;
        }
        let ari = decode_line(&line, args.inform, &catalog)
            .with_context(|| format!("line {}: decode", lineno + 1))?;
        encode_line(&ari, args.outform, &catalog, &args, &mut out)
            .with_context(|| format!("line {}: encode", lineno + 1))?;
    }
    Ok(())
}

fn decode_line(line: &str, form: Form, catalog: &Catalog) -> Result<Ari> {
    Ok(match form {
        Form::Text => text::parse_text(line)?,
        Form::Cbor => cbor::decode(line.as_bytes(), catalog, &CborCodecOptions::default())?,
        Form::Cborhex => {
            let bytes = hex::decode(line.trim()).context("input is not valid hex")?;
            cbor::decode(&bytes, catalog, &CborCodecOptions::default())?
        }
    })
}

fn encode_line(ari: &Ari, form: Form, catalog: &Catalog, args: &Args, out: &mut impl Write) -> Result<()> {
    match form {
        Form::Text => {
            let options = TextCodecOptions {
                numeric_names: args.must_nickname,
                ..TextCodecOptions::default()
            };
            let rendered = text::format_text(ari, &options, Some(catalog))?;
            writeln!(out, "{rendered}")?;
        }
        Form::Cbor | Form::Cborhex => {
            let options = CborCodecOptions {
                prefer_numeric_names: args.must_nickname,
                strict_resolve: args.must_typed,
                ..CborCodecOptions::default()
            };
            let bytes = cbor::encode(ari, catalog, &options)?;
            match form {
                Form::Cborhex => writeln!(out, "{}", hex::encode(bytes))?,
                _ => out.write_all(&bytes)?,
            }
        }
    }
    Ok(())
}
