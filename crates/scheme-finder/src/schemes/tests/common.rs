use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::schemes::catalog::SchemeCatalog;
use crate::schemes::eligibility::{EligibilityConfig, EligibilityEngine};
use crate::schemes::filter::FilterCache;
use crate::schemes::normalizer::Normalizer;
use crate::schemes::raw::RawSchemeRecord;
use crate::schemes::router::scheme_router;
use crate::schemes::saved::tests::common::{MemoryLocal, MemoryRemote};
use crate::schemes::saved::SavedSchemesService;
use crate::schemes::service::SchemeFinderService;

pub(super) type TestService = SchemeFinderService<MemoryRemote, MemoryLocal>;

pub(super) fn records() -> Value {
    json!([
        {
            "scheme_id": "nsp-girls",
            "scheme_name": "Post Matric Scholarship for Girls",
            "ministry": ["Ministry of Social Justice and Empowerment"],
            "states": ["All India"],
            "gender": ["Female"],
            "caste_categories": ["Scheduled Caste (SC)"],
            "scheme_category": ["Education & Learning"],
            "age_criteria": {"min": 16, "max": 30},
            "details": "Scholarship for girl students pursuing post matric education."
        },
        {
            "scheme_id": "kerala-fisher",
            "scheme_name": "Fishermen Housing Assistance",
            "ministry": ["Department of Fisheries, Kerala"],
            "states": ["Kerala"],
            "occupations": ["Fishermen"],
            "scheme_category": ["Housing & Shelter"],
            "details": "Financial assistance to fishermen families for building houses."
        },
        {
            "scheme_id": "pm-kisan",
            "scheme_name": "Pradhan Mantri Kisan Samman Nidhi",
            "ministry": ["Ministry of Agriculture and Farmers Welfare"],
            "states": ["All India"],
            "occupations": ["Farmer"],
            "scheme_category": ["Agriculture,Rural & Environment"],
            "details": "Income support to landholding farmer families."
        },
        {
            "scheme_id": "msme-cluster",
            "scheme_name": "Infrastructure Development Grant for Industrial Clusters",
            "ministry": ["Ministry of Micro, Small and Medium Enterprises"],
            "scheme_category": ["Business & Entrepreneurship"],
            "details": "Grant to industry associations for common facility centres."
        },
        {
            "scheme_id": "tn-disability",
            "scheme_name": "Maintenance Allowance for Differently Abled Persons",
            "ministry": ["Department for the Welfare of Differently Abled Persons"],
            "states": ["Tamil Nadu"],
            "requires_disability": true,
            "disability_percent": {"min": 40},
            "scheme_category": ["Social welfare & Empowerment"],
            "details": "Monthly maintenance allowance for persons with disabilities."
        }
    ])
}

pub(super) fn catalog() -> SchemeCatalog {
    let records: Vec<RawSchemeRecord> =
        serde_json::from_value(records()).expect("fixture records");
    let (catalog, report) = SchemeCatalog::from_records(records, &Normalizer::default());
    assert_eq!(report.loaded, 5);
    catalog
}

pub(super) fn build_service() -> (TestService, Arc<MemoryRemote>, Arc<MemoryLocal>) {
    build_service_with(MemoryRemote::default(), MemoryLocal::default())
}

pub(super) fn build_service_with(
    remote: MemoryRemote,
    local: MemoryLocal,
) -> (TestService, Arc<MemoryRemote>, Arc<MemoryLocal>) {
    let remote = Arc::new(remote);
    let local = Arc::new(local);
    let saved = SavedSchemesService::new(remote.clone(), local.clone());
    let service = SchemeFinderService::new(
        catalog(),
        EligibilityEngine::new(EligibilityConfig::default()),
        FilterCache::new(16),
        saved,
    );
    (service, remote, local)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    scheme_router(Arc::new(service))
}

pub(super) fn kerala_fisher_profile() -> Value {
    json!({
        "gender": "Male",
        "age": "38",
        "state": "Kerala",
        "occupation": "Fishermen",
        "isStudent": "No"
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
