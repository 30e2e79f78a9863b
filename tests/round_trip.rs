use std::sync::{mpsc, Arc};

use rand::{rngs::StdRng, Rng, SeedableRng};
use shannon_fano_codec::shannon_fano::{CodeWord, Coder};
use threadpool::ThreadPool;

fn random_sequence(rng: &mut StdRng) -> Vec<u16> {
    let alphabet_size = rng.gen_range(1..=200);
    let length = rng.gen_range(1..=2000);
    // squaring skews the distribution towards small symbols
    (0..length)
        .map(|_| {
            let x: f64 = rng.gen();
            (x * x * alphabet_size as f64) as u16
        })
        .collect()
}

fn assert_prefix_free(code_words: &[CodeWord]) {
    for (i, a) in code_words.iter().enumerate() {
        for (j, b) in code_words.iter().enumerate() {
            if i != j {
                assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
            }
        }
    }
}

/// every split has two non-empty parts, so the code tree is full
fn assert_kraft_sum_is_one(code_words: &[CodeWord]) {
    let max_length = code_words.iter().map(CodeWord::length).max().unwrap_or(0);
    assert!(max_length < 128, "Code words too long for this check");
    let sum: u128 = code_words
        .iter()
        .map(|c| 1_u128 << (max_length - c.length()))
        .sum();
    assert_eq!(sum, 1_u128 << max_length);
}

#[test]
fn test_random_sequences_round_trip() {
    let mut rng = StdRng::seed_from_u64(0);

    for _ in 0..100 {
        let symbols = random_sequence(&mut rng);
        let coder = Coder::new(&symbols).expect("sequence is not empty");
        let encoded = coder.encode_input().expect("all symbols are known");
        let decoded = coder.decode(&encoded).expect("stream is valid");
        assert_eq!(decoded, symbols);

        let code_words: Vec<CodeWord> = coder.code_table().iter().map(|(_, c)| *c).collect();
        assert_prefix_free(&code_words);
        assert_kraft_sum_is_one(&code_words);

        let total: usize = coder.frequencies().iter().map(|sf| sf.frequency).sum();
        assert_eq!(total, symbols.len());
    }
}

#[test]
fn test_random_sub_sequences_round_trip() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let symbols = random_sequence(&mut rng);
        let coder = Coder::new(&symbols).expect("sequence is not empty");
        let start = rng.gen_range(0..symbols.len());
        let end = rng.gen_range(start..=symbols.len());
        let sub_sequence = &symbols[start..end];
        let encoded = coder.encode(sub_sequence).expect("all symbols are known");
        assert_eq!(coder.decode(&encoded).expect("stream is valid"), sub_sequence);
    }
}

#[test]
fn test_shared_coder_decodes_concurrently() {
    let text = "Happy India Independence Day!!";
    let symbols: Vec<char> = text.chars().collect();
    let coder = Arc::new(Coder::new(&symbols).expect("sequence is not empty"));
    let encoded = Arc::new(coder.encode_input().expect("all symbols are known"));

    let threadpool = ThreadPool::new(4);
    let (sender, receiver) = mpsc::channel();
    for _ in 0..16 {
        let coder = Arc::clone(&coder);
        let encoded = Arc::clone(&encoded);
        let sender = sender.clone();
        threadpool.execute(move || {
            let decoded: String = coder
                .decode(&encoded)
                .expect("stream is valid")
                .into_iter()
                .collect();
            sender.send(decoded).expect("receiver is alive");
        });
    }
    drop(sender);

    let results: Vec<String> = receiver.iter().collect();
    assert_eq!(results.len(), 16, "Every worker must report");
    assert!(results.iter().all(|decoded| decoded == text));
}
