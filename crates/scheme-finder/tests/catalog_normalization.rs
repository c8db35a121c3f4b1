use scheme_finder::schemes::domain::{DisabilityLabels, SpecialCategories, ALL, CENTRAL};
use scheme_finder::schemes::normalizer::{age_tags, array_to_single_value};
use scheme_finder::schemes::raw::RangeCriteria;
use scheme_finder::schemes::{
    FacetDimension, FacetIndex, Normalizer, RawSchemeRecord, SchemeCatalog,
};
use serde_json::json;

const BUNDLED: &str = include_str!("../../../data/schemes.json");

fn bundled_catalog() -> SchemeCatalog {
    let (catalog, report) = SchemeCatalog::from_reader(BUNDLED.as_bytes(), &Normalizer::default())
        .expect("bundled dataset loads");
    assert_eq!(report.loaded, 8);
    assert!(report.duplicate_ids.is_empty());
    catalog
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn bundled_dataset_normalizes_every_record() {
    let catalog = bundled_catalog();

    let girls = catalog.get("post-matric-sc-girls").expect("scholarship present");
    assert_eq!(girls.classified_state, CENTRAL);
    assert_eq!(girls.filter_gender, "Female");
    assert_eq!(girls.filter_residence, ALL);
    assert_eq!(girls.filter_caste, strings(&["Scheduled Caste (SC)"]));
    assert_eq!(girls.age_tags, strings(&["11-20", "21-30"]));
    assert_eq!(girls.filter_disability_percentage, "No Disability Requirement");
    assert_eq!(girls.faq.len(), 1);

    let fisher = catalog.get("kerala-fisher-housing").expect("housing present");
    assert_eq!(fisher.classified_state, "Kerala");
    assert_eq!(fisher.filter_residence, ALL);
    assert_eq!(fisher.filter_occupation, "Fishermen");
    assert!(fisher.filter_special_categories.values().is_empty());
    assert_eq!(fisher.age_tags.len(), 11);

    let kisan = catalog.get("pm-kisan").expect("pm-kisan present");
    assert_eq!(kisan.filter_residence, "Rural");
    assert_eq!(
        kisan.filter_special_categories,
        SpecialCategories::One("Farmer".to_string())
    );
    assert_eq!(kisan.filter_caste, strings(&[ALL]));

    let cluster = catalog.get("msme-cluster-infra").expect("cluster present");
    assert_eq!(cluster.classified_state, CENTRAL);
    assert_eq!(cluster.filter_caste, strings(&[ALL]));
    assert_eq!(cluster.filter_occupation, "No");

    let disability = catalog.get("tn-disability-maintenance").expect("allowance present");
    assert_eq!(disability.filter_gender, ALL);
    assert_eq!(
        disability.filter_disability_percentage,
        "Moderate Disability (40-59%)"
    );

    let upper = catalog.get("up-pre-matric-obc").expect("pre-matric present");
    assert_eq!(upper.classified_state, "Uttar Pradesh");
    assert_eq!(upper.age_tags, strings(&["0-10", "11-20"]));

    let loan = catalog.get("minority-self-employment-loan").expect("loan present");
    assert_eq!(loan.filter_employment_status, ALL);
    assert_eq!(loan.filter_scheme_category.len(), 2);
}

#[test]
fn normalizing_twice_yields_identical_schemes() {
    let records: Vec<RawSchemeRecord> = serde_json::from_str(BUNDLED).expect("raw records");
    let normalizer = Normalizer::default();

    for record in &records {
        assert_eq!(normalizer.normalize(record), normalizer.normalize(record));
    }
}

#[test]
fn single_value_collapse_rules() {
    let collapse = |values: &[&str], default: &str| {
        let values = strings(values);
        array_to_single_value(Some(values.as_slice()), default)
    };

    assert_eq!(collapse(&["Male"], ALL), "Male");
    assert_eq!(collapse(&["Male", "Female"], ALL), ALL);
    assert_eq!(collapse(&["Male", "Male"], ALL), "Male");
    assert_eq!(collapse(&["All", "Male"], "No"), ALL);
    assert_eq!(collapse(&[], "No"), "No");
    assert_eq!(array_to_single_value(None, "No"), "No");
}

#[test]
fn age_overlap_and_disability_boundaries() {
    let young_adults = age_tags(Some(&RangeCriteria {
        min: Some(18.0),
        max: Some(25.0),
    }));
    assert!(young_adults.contains(&"11-20".to_string()));
    assert!(young_adults.contains(&"21-30".to_string()));
    assert!(!young_adults.contains(&"31-40".to_string()));

    let bucket = |min: u32, max: u32| {
        let raw: RawSchemeRecord = serde_json::from_value(json!({
            "scheme_id": "bucket-check",
            "requires_disability": true,
            "disability_percent": {"min": min, "max": max}
        }))
        .expect("raw record");
        Normalizer::new(DisabilityLabels::VerySevere)
            .normalize(&raw)
            .filter_disability_percentage
    };

    assert_eq!(bucket(79, 100), "Severe Disability (60-79%)");
    assert_eq!(bucket(80, 100), "Very Severe Disability (80%+)");
    assert_eq!(bucket(0, 0), "Any Disability (1%+)");
    assert_eq!(bucket(10, 30), "Mild Disability (1-39%)");
}

#[test]
fn malformed_entries_are_skipped_without_aborting_the_load() {
    let dataset = json!([
        42,
        {"scheme_name": "Nameless"},
        {"scheme_id": "first", "scheme_name": "First", "age_criteria": "eighteen"},
        {"scheme_id": "first", "scheme_name": "Second"}
    ])
    .to_string();

    let (catalog, report) = SchemeCatalog::from_reader(dataset.as_bytes(), &Normalizer::default())
        .expect("dataset loads");

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped_malformed, 1);
    assert_eq!(report.skipped_missing_id, 1);
    assert_eq!(report.duplicate_ids, vec!["first".to_string()]);

    let first = catalog.get("first").expect("first kept");
    assert_eq!(first.title, "First");
    assert_eq!(first.age_tags.len(), 11);
}

#[test]
fn bundled_facets_count_each_scheme_once_per_value() {
    let catalog = bundled_catalog();
    let index = FacetIndex::build(catalog.schemes());

    assert_eq!(index.total, 8);
    assert_eq!(index.count(FacetDimension::State, ALL), 8);
    assert_eq!(index.count(FacetDimension::State, CENTRAL), 4);
    assert_eq!(index.count(FacetDimension::State, "Kerala"), 1);
    assert_eq!(index.count(FacetDimension::Gender, "Female"), 2);
    assert_eq!(index.count(FacetDimension::Gender, ALL), 8);
    assert_eq!(
        index.count(FacetDimension::Category, "Social welfare & Empowerment"),
        2
    );
    assert_eq!(
        index.count(FacetDimension::Category, "Business & Entrepreneurship"),
        2
    );

    let ages = index.facet(FacetDimension::AgeGroup).expect("age facet");
    let labels: Vec<&str> = ages.options.iter().map(|option| option.value.as_str()).collect();
    assert_eq!(labels[0], ALL);
    assert_eq!(labels[1], "0-10");
    assert_eq!(labels[2], "11-20");
}
