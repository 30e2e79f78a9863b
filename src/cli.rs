use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgGroup, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_files_argument(command);
        let command = Self::register_text_argument(command);
        let command = Self::register_output_directory_argument(command);
        let command = Self::register_threads_argument(command);
        let command = Self::register_show_code_table_argument(command);
        let command = Self::register_show_bitstream_argument(command);
        command.group(Self::create_input_group())
    }

    fn register_input_files_argument(command: Command) -> Command {
        command.arg(Self::create_input_files_argument())
    }

    fn register_text_argument(command: Command) -> Command {
        command.arg(Self::create_text_argument())
    }

    fn register_output_directory_argument(command: Command) -> Command {
        command.arg(Self::create_output_directory_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_show_code_table_argument(command: Command) -> Command {
        command.arg(Self::create_show_code_table_argument())
    }

    fn register_show_bitstream_argument(command: Command) -> Command {
        command.arg(Self::create_show_bitstream_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_group() -> ArgGroup {
        ArgGroup::new("inputs")
            .args(["input_files", "text"])
            .required(true)
            .multiple(true)
    }

    fn create_input_files_argument() -> Arg {
        Arg::new("input_files")
            .help("Paths to text files to encode")
            .value_parser(value_parser!(PathBuf))
            .num_args(1..)
            .action(ArgAction::Append)
    }

    fn create_text_argument() -> Arg {
        arg!(text: -x --text <TEXT> "Literal text to encode, may be repeated")
            .action(ArgAction::Append)
    }

    fn create_output_directory_argument() -> Arg {
        arg!(output_directory: -o --output_directory <DIR> "Directory receiving the encoded bitstreams")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_show_code_table_argument() -> Arg {
        arg!(show_code_table: -c --show_code_table "Print the code table of each input")
            .action(ArgAction::SetTrue)
    }

    fn create_show_bitstream_argument() -> Arg {
        arg!(show_bitstream: -b --show_bitstream "Print the encoded bits of each input")
            .action(ArgAction::SetTrue)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_files: Self::extract_input_files_argument(matches),
            texts: Self::extract_text_argument(matches),
            output_directory: Self::extract_output_directory_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
            show_code_table: Self::extract_show_code_table_argument(matches),
            show_bitstream: Self::extract_show_bitstream_argument(matches),
        }
    }

    fn extract_input_files_argument(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<PathBuf>("input_files")
            .map(|files| files.cloned().collect())
            .unwrap_or_default()
    }

    fn extract_text_argument(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("text")
            .map(|texts| texts.cloned().collect())
            .unwrap_or_default()
    }

    fn extract_output_directory_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("output_directory").cloned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_show_code_table_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("show_code_table")
    }

    fn extract_show_bitstream_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("show_bitstream")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
