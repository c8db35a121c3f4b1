use std::io::Write;

use super::domain::Scheme;

const HEADER: [&str; 7] = [
    "scheme_id",
    "title",
    "ministry",
    "state",
    "categories",
    "gender",
    "caste",
];

/// Writes one CSV row per scheme; list fields are joined with `; `.
pub fn write_csv<W: Write>(writer: W, schemes: &[&Scheme]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for scheme in schemes {
        csv_writer.write_record([
            scheme.scheme_id.as_str(),
            scheme.title.as_str(),
            scheme.ministry.as_str(),
            scheme.classified_state.as_str(),
            &scheme.filter_scheme_category.join("; "),
            scheme.filter_gender.as_str(),
            &scheme.filter_caste.join("; "),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
