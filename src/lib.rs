use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    sync::Arc,
    path::{Path, PathBuf},
    sync::mpsc,
};

pub use cli::CLIParser;
use error::Error;
pub use report::EncodingReport;
use shannon_fano::{Coder, EncodedSequence};
use threadpool::ThreadPool;

pub mod binary_stream;
mod cli;
pub mod error;
mod logger;
mod report;
pub mod shannon_fano;

pub type Result<T> = std::result::Result<T, error::Error>;

const BITSTREAM_FILE_EXTENSION: &str = "sfc";

pub struct Arguments {
    input_files: Vec<PathBuf>,
    texts: Vec<String>,
    output_directory: Option<PathBuf>,
    number_of_threads: usize,
    show_code_table: bool,
    show_bitstream: bool,
}

#[derive(Clone)]
struct ReportOptions {
    output_directory: Option<PathBuf>,
    show_code_table: bool,
    show_bitstream: bool,
}

impl From<&Arguments> for ReportOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            output_directory: value.output_directory.clone(),
            show_code_table: value.show_code_table,
            show_bitstream: value.show_bitstream,
        }
    }
}

enum Input {
    File(PathBuf),
    Text { number: usize, text: String },
}

impl Input {
    fn name(&self) -> String {
        match self {
            Input::File(path) => path.display().to_string(),
            Input::Text { number, .. } => format!("text #{}", number),
        }
    }

    fn output_file_name(&self) -> String {
        match self {
            Input::File(path) => format!(
                "{}.{}",
                path.file_name().unwrap_or_default().to_string_lossy(),
                BITSTREAM_FILE_EXTENSION
            ),
            Input::Text { number, .. } => format!("text_{}.{}", number, BITSTREAM_FILE_EXTENSION),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Input::File(path) => fs::read_to_string(path).map_err(|e| {
                Error::UnableToReadInputFile(path.to_string_lossy().into_owned(), e)
            }),
            Input::Text { text, .. } => Ok(text.clone()),
        }
    }
}

fn collect_inputs(arguments: &Arguments) -> Vec<Input> {
    let files = arguments.input_files.iter().cloned().map(Input::File);
    let texts = arguments
        .texts
        .iter()
        .enumerate()
        .map(|(index, text)| Input::Text {
            number: index + 1,
            text: text.clone(),
        });
    files.chain(texts).collect()
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| Error::UnableToWriteOutputFile(file_path.to_string_lossy().into_owned(), e))
}

/// Stores the bitstream together with its bit length and symbol count,
/// see [`EncodedSequence::write_to`].
fn write_bitstream(
    output_directory: &Path,
    input: &Input,
    encoded: &EncodedSequence,
) -> Result<PathBuf> {
    let file_path = output_directory.join(input.output_file_name());
    let output_file = open_output_file(&file_path)?;
    let mut output_file_writer = BufWriter::new(output_file);
    encoded
        .write_to(&mut output_file_writer)
        .and_then(|_| output_file_writer.flush())
        .map_err(|e| Error::UnableToWriteOutputFile(file_path.to_string_lossy().into_owned(), e))?;
    Ok(file_path)
}

fn encode_input(input: &Input, options: &ReportOptions) -> Result<EncodingReport> {
    let name = input.name();
    let text = input.read()?;
    let symbols: Vec<char> = text.chars().collect();
    let coder = Coder::new(&symbols)?;
    let encoded = coder.encode_input()?;
    if coder.decode(&encoded)? != symbols {
        return Err(Error::RoundTripMismatch(name));
    }
    log::info!(
        "Encoded {} symbols of {} into {} bits",
        symbols.len(),
        name,
        encoded.bit_len()
    );
    let mut report = EncodingReport::new(&name, &text, &coder, &encoded);
    if options.show_code_table {
        report = report.with_code_table(&coder);
    }
    if options.show_bitstream {
        report = report.with_bitstream(&encoded);
    }
    if let Some(output_directory) = &options.output_directory {
        let output_file = write_bitstream(output_directory, input, &encoded)?;
        report = report.with_output_file(output_file);
    }
    Ok(report)
}

/// Encodes every input on its own worker, reports come back in input order.
pub fn encode_inputs(arguments: &Arguments) -> Result<Vec<EncodingReport>> {
    let options = ReportOptions::from(arguments);
    run_in_input_order(
        collect_inputs(arguments),
        arguments.number_of_threads,
        move |input| encode_input(input, &options),
    )
}

fn run_in_input_order<I, R, F>(inputs: Vec<I>, number_of_threads: usize, job: F) -> Result<Vec<R>>
where
    I: Send + 'static,
    R: Send + 'static,
    F: Fn(&I) -> Result<R> + Send + Sync + 'static,
{
    let input_count = inputs.len();
    let job = Arc::new(job);
    let threadpool = ThreadPool::new(number_of_threads.max(1));
    let (sender, receiver) = mpsc::channel();
    for (index, input) in inputs.into_iter().enumerate() {
        let sender = sender.clone();
        let job = Arc::clone(&job);
        threadpool.execute(move || {
            let result = job(&input);
            if sender.send((index, result)).is_err() {
                log::warn!("Result of input {} arrived after the receiver closed", index);
            }
        });
    }
    drop(sender);
    let mut results: Vec<(usize, Result<R>)> = receiver.iter().collect();
    if results.len() != input_count {
        log::error!(
            "Only {} of {} workers reported a result",
            results.len(),
            input_count
        );
        return Err(Error::WorkerTerminated);
    }
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}
