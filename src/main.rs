use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use env_logger::Env;
use log::debug;
use wordpack::{Dictionary, DEFAULT_WORD_FILE};

#[derive(Clone, Debug)]
struct CodecParams {
    input: PathBuf,
    output: PathBuf,
    words: PathBuf,
}

#[derive(Clone, Debug)]
enum Command {
    Pack(CodecParams),
    Unpack(CodecParams),
    Words(PathBuf),
}

#[derive(Debug)]
struct GlobalOptions {
    verbose: bool,
    stats: bool,
}

#[derive(Debug)]
struct AppParams {
    global: GlobalOptions,
    command: Command,
}

fn global_options_parser() -> impl Parser<GlobalOptions> {
    let verbose = long("verbose")
        .short('v')
        .help("Log dictionary and summary details (RUST_LOG overrides)")
        .switch();
    let stats = long("stats")
        .help("Print a summary of the run")
        .switch();

    construct!(GlobalOptions { verbose, stats })
}

fn words_parser() -> impl Parser<PathBuf> {
    positional::<PathBuf>("WORDS")
        .help("Word list the dictionary is built from, words.txt if omitted")
        .fallback(PathBuf::from(DEFAULT_WORD_FILE))
}

fn codec_parser() -> impl Parser<CodecParams> {
    let input = positional::<PathBuf>("INPUT").help("File to read");
    let output = positional::<PathBuf>("OUTPUT").help("File to write");
    let words = words_parser();

    construct!(CodecParams {
        input,
        output,
        words
    })
}

fn command_parser() -> OptionParser<AppParams> {
    let global = global_options_parser();

    let pack = construct!(Command::Pack(codec_parser()))
        .to_options()
        .command("pack")
        .help("Compress a text file");

    let unpack = construct!(Command::Unpack(codec_parser()))
        .to_options()
        .command("unpack")
        .help("Restore a compressed file");

    let words = construct!(Command::Words(words_parser()))
        .to_options()
        .command("words")
        .help("List the dictionary built from a word list, in code order");

    let command = construct!([pack, unpack, words]);

    construct!(AppParams { global, command })
        .to_options()
        .descr("Dictionary text compression with 9-bit codes")
}

fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let dictionary = Dictionary::from_path(path)
        .context("Can't load dictionary")?;
    debug!("{} has {} entries", path.display(), dictionary.len());
    Ok(dictionary)
}

fn run(params: AppParams) -> Result<()> {
    let AppParams { global, command } = params;

    match command {
        Command::Pack(params) => {
            // The word list is checked before either file is touched
            let dictionary = load_dictionary(&params.words)?;
            let summary = wordpack::pack_file(&params.input, &params.output, &dictionary)?;
            if global.stats {
                println!(
                    "{} bytes -> {} codes -> {} bytes ({} padding bits)",
                    summary.input_bytes, summary.codes, summary.output_bytes, summary.padding_bits
                );
                if let Some(ratio) = summary.ratio() {
                    println!("ratio {:.3}", ratio);
                }
            }
        }
        Command::Unpack(params) => {
            let dictionary = load_dictionary(&params.words)?;
            let summary = wordpack::unpack_file(&params.input, &params.output, &dictionary)?;
            if global.stats {
                println!(
                    "{} codes -> {} bytes",
                    summary.codes, summary.output_bytes
                );
            }
        }
        Command::Words(words) => {
            let dictionary = load_dictionary(&words)?;
            for (code, entry) in dictionary.iter() {
                println!("{} == {:?}", code, entry.word());
            }
        }
    }

    Ok(())
}

fn main() {
    let params = command_parser().run();

    let level = if params.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(params) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
