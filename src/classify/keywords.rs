//! Static domain → keyword table.
//!
//! Keywords are lowercase substrings matched against the joined, lowercased
//! category text. Short stems (`politic`, `biolog`) are deliberate so that
//! one keyword covers the noun, adjective and "-ist" forms.
//!
//! Table order is the classifier's tie-break order.

use crate::domain::Domain;

pub const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    // Social sciences
    (
        Domain::GovernmentPolitics,
        &[
            "politic", "government", "election", "democra", "republican", "legislat", "congress",
            "parliament", "vote", "campaign",
        ],
    ),
    (
        Domain::Economics,
        &["econom", "fiscal", "monetary", "trade", "market", "gdp", "inflation", "unemployment"],
    ),
    (
        Domain::Psychology,
        &["psycholog", "cognit", "behavior", "mental process", "perception"],
    ),
    (Domain::Sociology, &["sociolog", "social", "society", "culture", "community"]),
    (Domain::Anthropology, &["anthropolog", "cultural", "ethnic", "civilization"]),
    // Business
    (
        Domain::Management,
        &["management", "organizational", "business admin", "leadership", "corporate"],
    ),
    (
        Domain::AccountingFinance,
        &["accounting", "finance", "financial", "investment", "banking", "audit", "stock", "bond"],
    ),
    (
        Domain::BusinessLaw,
        &["business law", "corporate law", "contract", "commercial law", "legal"],
    ),
    (Domain::Entrepreneurship, &["entrepreneur", "startup", "venture", "founder"]),
    (Domain::Marketing, &["marketing", "advertising", "brand", "consumer", "promotion"]),
    (Domain::BusinessStatistics, &["business stat", "econometric"]),
    // Health
    (Domain::Nursing, &["nursing", "nurse", "patient care", "healthcare"]),
    (
        Domain::ClinicalMedicine,
        &[
            "clinical", "medicine", "medical", "diagnosis", "treatment", "disease", "hospital",
            "health", "patient", "doctor", "physician",
        ],
    ),
    (
        Domain::Obstetrics,
        &["obstetric", "midwife", "maternal", "pregnancy", "childbirth", "prenatal"],
    ),
    (
        Domain::MentalHealth,
        &["psychiatric", "mental health", "psychiatry", "depression", "anxiety", "therapy"],
    ),
    (Domain::Surgery, &["surgery", "surgical", "operation", "surgeon"]),
    (
        Domain::NutritionPharma,
        &[
            "nutrition", "pharmacolog", "dietetic", "drug", "pharmaceutical", "vitamin",
            "supplement",
        ],
    ),
    (
        Domain::PublicHealth,
        &["public health", "epidemiolog", "community health", "preventive", "vaccination"],
    ),
    // Humanities
    (
        Domain::History,
        &[
            "history", "historical", "historian", "century", "wars", "warfare", "world war",
            "ancient", "medieval",
        ],
    ),
    (
        Domain::Philosophy,
        &["philosoph", "ethics", "logic", "metaphysic", "epistemolog", "moral"],
    ),
    (
        Domain::Writing,
        &[
            "writing", "rhetoric", "composition", "grammar", "literature", "literary", "author",
            "poet",
        ],
    ),
    // Life sciences
    (
        Domain::AnatomyPhysiology,
        &["anatomy", "physiolog", "human body", "organ", "muscle", "skeleton", "tissue"],
    ),
    (
        Domain::Biology,
        &[
            "biolog", "genetic", "ecology", "evolution", "organism", "species", "botany", "zoology",
            "cell", "dna", "protein", "ecosystem",
        ],
    ),
    (
        Domain::Microbiology,
        &["microbiolog", "bacteriolog", "virolog", "bacteria", "virus", "microbe", "pathogen"],
    ),
    // Physical sciences
    (
        Domain::Astronomy,
        &[
            "astronomy", "astrophysic", "cosmolog", "planet", "star", "galaxy", "space", "solar",
            "celestial",
        ],
    ),
    (
        Domain::Physics,
        &[
            "physics", "mechanic", "thermodynamic", "quantum", "relativity", "electromagnetic",
            "force", "energy", "motion", "particle",
        ],
    ),
    (
        Domain::Chemistry,
        &[
            "chemistry", "chemical", "biochem", "organic chem", "molecule", "compound", "reaction",
            "element", "atom",
        ],
    ),
    // Math and statistics
    (
        Domain::Mathematics,
        &[
            "mathematic", "algebra", "calculus", "geometry", "trigonometry", "theorem", "equation",
            "proof",
        ],
    ),
    (
        Domain::Statistics,
        &["statistic", "probability", "data analysis", "variance", "distribution"],
    ),
    // Computing
    (
        Domain::ComputerScience,
        &[
            "computer science", "algorithm", "programming", "software", "computing", "code",
            "database", "network",
        ],
    ),
    (
        Domain::DataScience,
        &[
            "data science", "machine learning", "artificial intelligence", "neural network",
            "deep learning",
        ],
    ),
];
