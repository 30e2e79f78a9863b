use shannon_fano_codec::shannon_fano::Coder;
use shannon_fano_codec::Result;

fn main() -> Result<()> {
    let input_text = "Happy India Independence Day!!";
    println!("input text\n{}", input_text);
    println!("input text bits\n{}", input_text.len() * 8);

    let symbols: Vec<char> = input_text.chars().collect();
    let coder = Coder::new(&symbols)?;
    println!("code table\n{}", coder.code_table());
    println!("decode trie\n{}", coder.decode_trie());

    let encoded = coder.encode_input()?;
    println!("encoded\n{}", encoded.bits());
    println!("encoded bits\n{}", encoded.bit_len());

    let decoded: String = coder.decode(&encoded)?.into_iter().collect();
    println!("decoded\n{}", decoded);
    Ok(())
}
