use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use wordpack::{Decoder, Dictionary, Encoder, PackSummary};

/// A packed file bundled with the dictionary that packed it.
#[derive(Serialize, Deserialize)]
struct PackedBundle {
    data: Vec<u8>,
    summary: PackSummary,
    dictionary: Dictionary,
}

fn main() {
    let fp = env::args().nth(1).expect("Please provide path to input file as first argument.");
    let words = env::args().nth(2).unwrap_or_else(|| wordpack::DEFAULT_WORD_FILE.to_string());

    let input_bytes = fs::read(fp).expect("First argument was not a valid filepath.");

    // pack scope - save to file
    {
        let dictionary = Dictionary::from_path(&words).unwrap();
        let (data, summary) = Encoder::new(&dictionary).encode_to_vec(&input_bytes).unwrap();
        let bundle = PackedBundle { data, summary, dictionary };

        fs::write("packed.mp", rmp_serde::to_vec(&bundle).unwrap()).unwrap();
        println!("{:?}", summary);
    }

    // unpack scope - read from file
    {
        let file_data = fs::read("packed.mp").unwrap();

        let bundle: PackedBundle = rmp_serde::from_slice(&file_data).unwrap();
        let (decoded, _) = Decoder::new(&bundle.dictionary).decode_to_vec(&bundle.data).unwrap();

        fs::write("unpacked.txt", decoded).unwrap();
    }
}
