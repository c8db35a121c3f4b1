use crate::infra::{build_service, AppService};
use clap::Args;
use scheme_finder::config::AppConfig;
use scheme_finder::error::AppError;
use scheme_finder::schemes::eligibility::{
    Answer, EligibilityOutcome, EligibilityProfile, EligibilityStrategy,
};
use scheme_finder::schemes::export::write_csv;
use scheme_finder::schemes::filter::{from_query_string, to_query_string};
use scheme_finder::schemes::{
    FacetDimension, FacetIndex, FacetSelection, MinistrySummary, SchemePage, StateSummary,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

pub(crate) fn parse_answer(raw: &str) -> Result<Answer, String> {
    Answer::parse(raw).ok_or_else(|| format!("expected yes or no, found '{raw}'"))
}

pub(crate) fn parse_strategy(raw: &str) -> Result<EligibilityStrategy, String> {
    EligibilityStrategy::from_name(raw)
        .ok_or_else(|| format!("expected 'strict' or 'scored', found '{raw}'"))
}

pub(crate) fn parse_dimension(raw: &str) -> Result<FacetDimension, String> {
    FacetDimension::from_query_key(raw.trim()).ok_or_else(|| {
        let keys: Vec<&str> = FacetDimension::ordered()
            .into_iter()
            .map(FacetDimension::query_key)
            .collect();
        format!("unknown facet '{raw}', expected one of: {}", keys.join(", "))
    })
}

#[derive(Args, Debug, Default)]
pub(crate) struct SelectionArgs {
    /// Shared filter link, e.g. "states=Kerala&categories=Housing%2520%2526%2520Shelter"
    #[arg(long)]
    pub(crate) link: Option<String>,
    /// Free-text search words
    #[arg(long, short = 'q')]
    pub(crate) query: Option<String>,
    /// State filter (repeatable)
    #[arg(long = "state")]
    pub(crate) states: Vec<String>,
    /// Category filter (repeatable)
    #[arg(long = "category")]
    pub(crate) categories: Vec<String>,
    /// Gender filter (repeatable)
    #[arg(long = "gender")]
    pub(crate) genders: Vec<String>,
    /// Caste filter (repeatable)
    #[arg(long = "caste")]
    pub(crate) castes: Vec<String>,
    /// Ministry filter (repeatable)
    #[arg(long = "ministry")]
    pub(crate) ministries: Vec<String>,
}

impl SelectionArgs {
    pub(crate) fn selection(&self) -> FacetSelection {
        let mut selection = self
            .link
            .as_deref()
            .map(from_query_string)
            .unwrap_or_default();

        let flags = [
            (FacetDimension::State, &self.states),
            (FacetDimension::Category, &self.categories),
            (FacetDimension::Gender, &self.genders),
            (FacetDimension::Caste, &self.castes),
            (FacetDimension::Ministry, &self.ministries),
        ];
        for (dimension, values) in flags {
            for value in values {
                selection.select(dimension, value.as_str());
            }
        }

        if let Some(query) = &self.query {
            selection.query = query.clone();
        }
        selection
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    /// Result page (1-based)
    #[arg(long)]
    pub(crate) page: Option<usize>,
    /// Results per page (default 20)
    #[arg(long)]
    pub(crate) per_page: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct EligibilityArgs {
    /// JSON profile file; flags below override its fields
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    #[arg(long)]
    pub(crate) gender: Option<String>,
    #[arg(long)]
    pub(crate) age: Option<u32>,
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) caste: Option<String>,
    #[arg(long)]
    pub(crate) residence: Option<String>,
    #[arg(long)]
    pub(crate) marital_status: Option<String>,
    #[arg(long)]
    pub(crate) employment_status: Option<String>,
    #[arg(long)]
    pub(crate) occupation: Option<String>,
    /// Yes/No
    #[arg(long, value_parser = parse_answer)]
    pub(crate) student: Option<Answer>,
    /// Yes/No
    #[arg(long, value_parser = parse_answer)]
    pub(crate) disability: Option<Answer>,
    #[arg(long)]
    pub(crate) disability_percentage: Option<u32>,
    /// Yes/No
    #[arg(long, value_parser = parse_answer)]
    pub(crate) bpl: Option<Answer>,
    /// Yes/No
    #[arg(long, value_parser = parse_answer)]
    pub(crate) minority: Option<Answer>,
    /// Yes/No
    #[arg(long, value_parser = parse_answer)]
    pub(crate) agri_land: Option<Answer>,
    /// strict or scored (defaults to APP_ELIGIBILITY_STRATEGY)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<EligibilityStrategy>,
}

impl EligibilityArgs {
    pub(crate) fn profile(&self) -> Result<EligibilityProfile, AppError> {
        let mut profile = match &self.profile {
            Some(path) => {
                let file = File::open(path)?;
                serde_json::from_reader(io::BufReader::new(file)).map_err(io::Error::from)?
            }
            None => EligibilityProfile::default(),
        };

        fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        overlay(&mut profile.gender, &self.gender);
        overlay(&mut profile.age, &self.age);
        overlay(&mut profile.state, &self.state);
        overlay(&mut profile.caste, &self.caste);
        overlay(&mut profile.residence_type, &self.residence);
        overlay(&mut profile.marital_status, &self.marital_status);
        overlay(&mut profile.employment_status, &self.employment_status);
        overlay(&mut profile.occupation, &self.occupation);
        overlay(&mut profile.is_student, &self.student);
        overlay(&mut profile.has_disability, &self.disability);
        overlay(&mut profile.disability_percentage, &self.disability_percentage);
        overlay(&mut profile.is_bpl, &self.bpl);
        overlay(&mut profile.is_minority, &self.minority);
        overlay(&mut profile.owns_agri_land, &self.agri_land);
        Ok(profile)
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct FacetArgs {
    /// Only list this facet (query key, e.g. "states" or "ageGroup")
    #[arg(long, value_parser = parse_dimension)]
    pub(crate) dimension: Option<FacetDimension>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct BrowseArgs {
    /// List central ministries instead of states
    #[arg(long)]
    pub(crate) ministries: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    /// Destination CSV file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub(crate) output: Option<PathBuf>,
}

fn load_service() -> Result<AppService, AppError> {
    let config = AppConfig::load()?;
    build_service(&config)
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let selection = args.selection.selection();
    let page = service.search_page(&selection, args.page, args.per_page);
    render_search(&mut io::stdout().lock(), &selection, &page)?;
    Ok(())
}

pub(crate) fn run_eligibility(args: EligibilityArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let profile = args.profile()?;
    let outcome = service.eligibility(&profile, args.strategy);
    render_eligibility(&mut io::stdout().lock(), &outcome)?;
    Ok(())
}

pub(crate) fn run_facets(args: FacetArgs) -> Result<(), AppError> {
    let service = load_service()?;
    render_facets(&mut io::stdout().lock(), service.facets(), args.dimension)?;
    Ok(())
}

pub(crate) fn run_browse(args: BrowseArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let mut out = io::stdout().lock();
    if args.ministries {
        render_ministries(&mut out, service.ministries())?;
    } else {
        render_states(&mut out, service.states())?;
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let selection = args.selection.selection();
    let schemes = service.search(&selection);

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            write_csv(BufWriter::new(file), &schemes)?;
            eprintln!("Exported {} schemes to {}", schemes.len(), path.display());
        }
        None => write_csv(io::stdout().lock(), &schemes)?,
    }
    Ok(())
}

pub(crate) fn render_search(
    out: &mut impl Write,
    selection: &FacetSelection,
    page: &SchemePage<'_>,
) -> io::Result<()> {
    let link = to_query_string(selection);
    if !link.is_empty() {
        writeln!(out, "Filters: {link}")?;
    }
    writeln!(
        out,
        "{} matching schemes (page {} of {})",
        page.total,
        page.page,
        page.total_pages.max(1)
    )?;
    for scheme in &page.schemes {
        writeln!(
            out,
            "- {} [{}] {}",
            scheme.title, scheme.classified_state, scheme.scheme_id
        )?;
    }
    Ok(())
}

pub(crate) fn render_eligibility(
    out: &mut impl Write,
    outcome: &EligibilityOutcome<'_>,
) -> io::Result<()> {
    writeln!(
        out,
        "{} of {} schemes match ({} strategy)",
        outcome.len(),
        outcome.evaluated,
        outcome.strategy
    )?;
    for entry in &outcome.eligible {
        match entry.score {
            Some(score) => writeln!(
                out,
                "- {} [{}] score {score}",
                entry.scheme.title, entry.scheme.classified_state
            )?,
            None => writeln!(
                out,
                "- {} [{}]",
                entry.scheme.title, entry.scheme.classified_state
            )?,
        }
        for component in &entry.components {
            writeln!(out, "    {:+} {}", component.score, component.notes)?;
        }
    }
    Ok(())
}

pub(crate) fn render_facets(
    out: &mut impl Write,
    index: &FacetIndex,
    only: Option<FacetDimension>,
) -> io::Result<()> {
    for facet in index
        .facets
        .iter()
        .filter(|facet| only.map_or(true, |dimension| dimension == facet.dimension))
    {
        writeln!(out, "{} ({})", facet.title, facet.key)?;
        for option in &facet.options {
            writeln!(out, "  {:>5}  {}", option.count, option.label)?;
        }
    }
    Ok(())
}

pub(crate) fn render_states(out: &mut impl Write, states: &[StateSummary]) -> io::Result<()> {
    for state in states {
        let kind = if state.is_union_territory {
            "union territory"
        } else {
            "state"
        };
        writeln!(
            out,
            "{:>5}  {} ({kind}, {} central schemes also apply)",
            state.scheme_count, state.name, state.central_count
        )?;
    }
    Ok(())
}

pub(crate) fn render_ministries(
    out: &mut impl Write,
    ministries: &[MinistrySummary],
) -> io::Result<()> {
    for ministry in ministries {
        writeln!(out, "{:>5}  {}", ministry.scheme_count, ministry.short_name)?;
    }
    Ok(())
}
