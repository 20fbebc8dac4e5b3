//! Fixed catalog of federal task scenarios offered by the evaluation
//! screen. Each prompt is the complete task text sent as the user
//! message; the catalog is served to clients as-is.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

/// Looks up a scenario by its id.
pub fn find(id: &str) -> Option<&'static Scenario> {
    FEDERAL_SCENARIOS.iter().find(|s| s.id == id)
}

pub const FEDERAL_SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "foia-redaction",
        label: "FOIA Request Processing",
        description: "Review a document and identify information requiring redaction under FOIA exemptions",
        prompt: r#"You are processing a FOIA request for the Department of Homeland Security. The following document excerpt is from an internal threat assessment report. Identify all information that should be redacted under FOIA Exemptions 1 (national security), 6 (personal privacy), and 7(E) (law enforcement techniques). For each redaction, specify the exemption number and briefly explain why.

---
INTERNAL MEMO — DHS/I&A
Date: October 15, 2025
From: Senior Intelligence Analyst James Morrison (james.morrison@dhs.gov)
Subject: Emerging Threat Pattern — Port of Long Beach

Based on SIGINT collection from NSA reporting (TS//SI//NOFORN downgraded to FOUO), we have identified a pattern of suspicious cargo manifests originating from three shell companies linked to PRC-affiliated entities. The companies — Evergreen Pacific Trading (EIN: 84-2947361), Shenzhen Maritime LLC, and Golden Dragon Imports — have collectively shipped 47 containers through Long Beach in the past 90 days.

Our HUMINT source (designated COASTWATCH-7) reports that dock workers at Terminal G have observed unusual overnight loading operations. CBP Officer Sarah Chen (badge #4471) has flagged 12 of these shipments for secondary inspection.

Recommendation: Coordinate with FBI JTTF Los Angeles and CBP targeting center. Deploy mobile NII (non-intrusive inspection) assets to Terminal G during the November 1-15 window.
---"#,
    },
    Scenario {
        id: "policy-analysis",
        label: "Policy Document Analysis",
        description: "Extract key requirements and obligations from a federal regulation",
        prompt: r#"Extract all mandatory requirements (indicated by 'shall', 'must', 'required') from the following excerpt of a proposed federal regulation. For each requirement, identify: (1) who is obligated, (2) what they must do, (3) the deadline or trigger condition, and (4) any exceptions or waivers mentioned.

---
SEC. 4. AI SYSTEM TRANSPARENCY REQUIREMENTS.

(a) DISCLOSURE.—Each covered agency shall, not later than 180 days after the date of enactment of this Act, publish on its public website a complete inventory of all artificial intelligence systems in operational use, including—
(1) the purpose and intended use of each system;
(2) the training data sources, to the extent not classified;
(3) the assessed risk level under the framework established in subsection (c).

(b) IMPACT ASSESSMENTS.—Before deploying any AI system that makes or materially supports decisions affecting individual rights, benefits, or access to government services, the head of each covered agency must—
(1) complete an algorithmic impact assessment consistent with NIST AI RMF standards;
(2) provide a 30-day public comment period for high-risk systems;
(3) submit the assessment to the agency Inspector General and to the Director of OMB.

(c) EXCEPTIONS.—The requirements of subsections (a) and (b) shall not apply to AI systems used exclusively for—
(1) internal IT operations and cybersecurity defense;
(2) intelligence activities conducted under Executive Order 12333;
(3) systems with fewer than 100 monthly interactions with members of the public.
---"#,
    },
    Scenario {
        id: "constituent-response",
        label: "Constituent Inquiry Response",
        description: "Draft a professional response to a citizen letter",
        prompt: r#"Draft a response letter on behalf of the Department of Veterans Affairs to the following constituent inquiry. The response should be empathetic, accurate, reference specific VA programs where applicable, and include next steps the veteran can take. Use appropriate government letter formatting.

---
Dear VA,

My name is Robert Hernandez and I served in the Marine Corps from 2003 to 2011, including two deployments to Iraq (Fallujah 2004, Ramadi 2006). I was honorably discharged as a Sergeant (E-5).

I've been struggling with PTSD symptoms for years but was too proud to ask for help. Last month I finally went to the VA clinic in Phoenix and they told me I needed to file a claim for service-connected disability, but the process seems impossible. I filled out some forms but I don't understand what evidence I need or how long this will take. I'm also worried because I waited so long — does that mean I can't get benefits?

I'm currently unemployed and having trouble keeping a job because of my symptoms. My wife says I should also ask about vocational rehabilitation but I don't know if I qualify.

Any help would be appreciated.

Respectfully,
Robert Hernandez
Phoenix, AZ
---"#,
    },
    Scenario {
        id: "contract-review",
        label: "Contract Review",
        description: "Identify key terms, risks, and compliance issues in a federal contract",
        prompt: r#"Review the following federal contract excerpt and identify: (1) key performance obligations, (2) potential risks to the agency, (3) FAR/DFARS compliance concerns, (4) any terms that are unusual or potentially unfavorable. Provide a risk rating (Low/Medium/High) for each finding.

---
TASK ORDER 47QFCA-24-F-0089
Agency: General Services Administration (GSA)
Contractor: NovaTech Solutions Inc.
Contract Vehicle: OASIS+ SB Pool 1
Period of Performance: Base year + 4 option years
Ceiling: $12,400,000

C.3 SCOPE OF WORK
The Contractor shall provide artificial intelligence and machine learning services to support GSA's Federal Acquisition Service (FAS) in automating category management analytics. This includes:
(a) Development and deployment of ML models for spend analysis across all federal procurement data
(b) Real-time anomaly detection for pricing irregularities
(c) Natural language processing of contract documents for clause extraction and compliance checking

C.4 DATA RIGHTS
All models, algorithms, and derivative works developed under this task order shall be the exclusive property of the Government with unlimited rights per FAR 52.227-14. The Contractor grants the Government a perpetual, irrevocable license to all pre-existing intellectual property incorporated into deliverables.

C.7 PERSONNEL
The Contractor's Key Personnel (Program Manager and Lead Data Scientist) shall not be substituted without 30 days prior written approval. The Government reserves the right to approve all personnel security clearances. Contractor personnel shall complete annual cybersecurity awareness training per FISMA requirements.

C.9 SERVICE LEVEL AGREEMENTS
System availability: 99.5% measured monthly. Response time for anomaly alerts: <15 minutes during business hours. Model retraining: quarterly at minimum, with accuracy benchmarks maintaining >92% precision on test datasets.
---"#,
    },
    Scenario {
        id: "data-extraction",
        label: "Data Extraction",
        description: "Pull structured data from an unstructured federal report",
        prompt: r#"Extract all quantitative data points from the following agency report excerpt into a structured table format. For each data point, capture: (1) metric name, (2) value, (3) time period, (4) comparison/trend if mentioned, (5) source/context. Flag any data points that appear inconsistent or potentially erroneous.

---
FY2025 Q3 PERFORMANCE REPORT — USCIS IMMIGRATION SERVICES

Processing times for Form I-485 (Adjustment of Status) decreased from 11.2 months in Q2 to 9.8 months in Q3, a 12.5% improvement attributed to the new AI-assisted document review pilot. However, the Nebraska Service Center reported a contradictory increase to 13.1 months due to staffing shortages affecting 23% of adjudication officers.

Naturalization ceremonies processed 224,300 new citizens in Q3, up from 198,750 in Q2 (12.9% increase). The online naturalization test pilot program, launched in 47 field offices, showed a 94.2% pass rate compared to the national average of 91.7% for in-person testing.

Fraud detection rates improved significantly: the FDNS (Fraud Detection and National Security) directorate identified 3,847 suspected fraud cases in Q3 versus 2,912 in Q2, a 32.1% increase. Of these, 2,103 were related to employment-based petitions and 891 to family-based filings. Approximately $14.2 million in fraudulent benefits were prevented, though this figure likely underestimates the true impact by 40-60% according to the OIG.

Backlog reduction targets remain challenging: total pending cases stand at 8.3 million, down from 8.7 million at the start of FY2025 but still 2.1 million above the FY2019 baseline of 6.2 million. The agency projects reaching 7.0 million by end of FY2026 assuming current staffing levels and no policy changes.
---"#,
    },
];
