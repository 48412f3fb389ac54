use wordpack::{Decoder, Dictionary, Encoder};

fn main() {
    let dict = Dictionary::from_reader(&b"5 Hello\n2 my\n4 name\n2 is\n"[..]).unwrap();
    let s = String::from("Hello my name is Sam!");

    let (packed, summary) = Encoder::new(&dict).encode_to_vec(s.as_bytes()).unwrap();
    let (unpacked, _) = Decoder::new(&dict).decode_to_vec(&packed).unwrap();

    println!("{:?}", summary);
    println!("{:?}", String::from_utf8(unpacked));
}
