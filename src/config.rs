//! Mechanism for loading the PID cuts configuration of a selection run

use crate::Result;

use eyre::{format_err, WrapErr};
use pidcuts::{
    params::{CUT_PARAMETERS, NUM_CUT_PARAMETERS},
    qa::QaLevel,
    CutCode, PidCutsConfig, Species,
};

use std::{fs, str::FromStr};

/// Selection run configuration
pub struct Configuration {
    /// Species which tracks are selected for
    pub target: Species,

    /// Instance number of the PID cuts
    pub cut_number: u32,

    /// Amount of quality assurance output
    pub qa_level: QaLevel,

    /// Data-taking period of the track sample
    pub period: String,

    /// Whether the sample comes from on-the-fly simulation
    pub on_the_fly_mc: bool,

    /// One code per cut parameter, in parameter order
    pub codes: [CutCode; NUM_CUT_PARAMETERS],

    /// Path of the track sample
    pub tracks_path: String,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: &str) -> Result<Self> {
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read configuration file {}", file_name))?;
        let config = Self::parse(&config_str)?;

        // Display it before checking, this eases fixing it
        config.print();

        // Codes must make sense all together
        PidCutsConfig::new(config.target)
            .apply_codes(&config.codes)
            .wrap_err("Invalid cut parameter codes")?;

        Ok(config)
    }

    /// Decode the configuration items of a configuration file
    fn parse(config_str: &str) -> Result<Self> {
        // We will iterate over the configuration items. These should be the
        // first non-whitespace chunk of text on each line, the rest of the
        // line being free for comments. We will ignore blank lines.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| format_err!("Missing configuration of {}", name))
        };

        let target = next_item("target")?.parse::<Species>()?;
        let cut_number = next_item("cut_number")?.parse::<u32>()?;
        let qa_level = next_item("qa_level")?.parse::<QaLevel>()?;
        let period = next_item("period")?.data.to_owned();
        let on_the_fly_mc = next_item("on_the_fly_mc")?.parse_bool()?;
        let mut codes = [0; NUM_CUT_PARAMETERS];
        for (code, parameter) in codes.iter_mut().zip(CUT_PARAMETERS.iter()) {
            *code = next_item(parameter.name)?.parse::<CutCode>()?;
        }
        let tracks_path = next_item("tracks")?.data.to_owned();

        Ok(Configuration {
            target,
            cut_number,
            qa_level,
            period,
            on_the_fly_mc,
            codes,
            tracks_path,
        })
    }

    /// Build the cut configuration described by this run configuration
    pub fn cuts(&self) -> Result<PidCutsConfig> {
        let mut cuts = PidCutsConfig::new(self.target);
        cuts.apply_codes(&self.codes)?;
        Ok(cuts)
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("TARGET         : {}", self.target);
        println!("CUTNUMBER      : {}", self.cut_number);
        println!("QALEVEL        : {:?}", self.qa_level);
        println!("PERIOD         : {}", self.period);
        println!("ONTHEFLYMC     : {}", self.on_the_fly_mc);
        for (code, parameter) in self.codes.iter().zip(CUT_PARAMETERS.iter()) {
            println!("{:<15}: {}", parameter.name.to_uppercase(), code);
        }
        println!("TRACKS         : {}", self.tracks_path);
    }
}

/// A value from a configuration or track file, tagged with the field which
/// it is supposed to map for error reporting purposes.
pub struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build an item from a field tag and raw text
    pub fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    pub fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse {} from {:?}", self.name, self.data))
    }

    /// Parse this data using special logic which also handles Fortran's and
    /// C's bool syntax
    pub fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            ".true." | "1" => Ok(true),
            ".false." | "0" => Ok(false),
            // Delegate other booleans to the standard Rust parser
            _ => self.parse::<bool>(),
        }
    }
}
