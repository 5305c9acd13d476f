use crate::report::PatientFilter;

#[derive(clap::Args, Clone, Debug, Default)]
#[command(about, long_about)]
///
/// Print high-risk patients matching a category and age range as JSON.
/// Reads the existing reports, or generates them first if either file is missing.
///
pub struct Filter {
    ///
    /// Risk category label, eg "High Risk"
    ///
    #[arg(short, long)]
    pub category: Option<String>,

    /// Minimum age, inclusive
    #[arg(long)]
    pub min_age: Option<u32>,

    /// Maximum age, inclusive
    #[arg(long)]
    pub max_age: Option<u32>,
}

impl From<&Filter> for PatientFilter {
    fn from(args: &Filter) -> Self {
        PatientFilter {
            category: args.category.clone(),
            min_age: args.min_age,
            max_age: args.max_age,
        }
    }
}
