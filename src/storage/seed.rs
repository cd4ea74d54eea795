//! Sample regulations for a freshly initialized tracker.

use chrono::{NaiveDate, TimeZone, Utc};
use tracing::info;

use super::Gateway;
use crate::entity::{ActionStatus, NewAction, NewLink, NewRegulation, RegulationStatus};
use crate::error::Result;

struct SeedLink {
    url: &'static str,
    link_type: &'static str,
    title: &'static str,
}

struct SeedAction {
    title: &'static str,
    description: &'static str,
    status: ActionStatus,
    assignee: &'static str,
    due: (i32, u32, u32),
}

struct SeedRegulation {
    title: &'static str,
    source: &'static str,
    jurisdiction: &'static str,
    category: &'static str,
    effective: (i32, u32, u32),
    received: (i32, u32, u32, u32, u32),
    summary: &'static str,
    status: RegulationStatus,
    links: &'static [SeedLink],
    actions: &'static [SeedAction],
}

const SEED: &[SeedRegulation] = &[
    SeedRegulation {
        title: "EU MRV 2025 Amendments",
        source: "EU",
        jurisdiction: "EU",
        category: "Environmental",
        effective: (2025, 1, 1),
        received: (2025, 7, 15, 10, 0),
        summary: "Revised monitoring & reporting for CO₂ and CH₄.",
        status: RegulationStatus::InProgress,
        links: &[
            SeedLink {
                url: "https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=CELEX:32025R-MRV",
                link_type: "official",
                title: "EUR-Lex: MRV 2025",
            },
            SeedLink {
                url: "https://example.com/mrv-guide.pdf",
                link_type: "guidance",
                title: "Practical MRV Guide (PDF)",
            },
        ],
        actions: &[
            SeedAction {
                title: "Update data pipeline for CH₄",
                description: "Include methane reporting in MRV extracts",
                status: ActionStatus::InProgress,
                assignee: "A. Smith",
                due: (2025, 8, 20),
            },
            SeedAction {
                title: "Crew circular MRV changes",
                description: "Ops circular outlining new monitoring plan",
                status: ActionStatus::Planned,
                assignee: "M. Lopez",
                due: (2025, 8, 25),
            },
        ],
    },
    SeedRegulation {
        title: "IMO MARPOL Annex VI NOx Tier III Guidance",
        source: "IMO",
        jurisdiction: "Global",
        category: "Technical",
        effective: (2025, 6, 30),
        received: (2025, 7, 20, 9, 0),
        summary: "Clarifies EIAPP documentation and testing windows for retrofits.",
        status: RegulationStatus::Open,
        links: &[SeedLink {
            url: "https://www.imo.org/en/OurWork/Environment/Pages/Air-Pollution.aspx",
            link_type: "official",
            title: "IMO Air Pollution",
        }],
        actions: &[SeedAction {
            title: "Assess retrofit feasibility",
            description: "Check Tier III compliance options for 2012-2016 builds",
            status: ActionStatus::Planned,
            assignee: "J. Kim",
            due: (2025, 9, 10),
        }],
    },
    SeedRegulation {
        title: "USCG Policy Letter 25-04 on E-Navigation Logs",
        source: "USCG",
        jurisdiction: "USA",
        category: "Navigation",
        effective: (2025, 9, 1),
        received: (2025, 7, 25, 12, 30),
        summary: "Accepts specific e-nav log formats with integrity checks.",
        status: RegulationStatus::Open,
        links: &[SeedLink {
            url: "https://www.dco.uscg.mil/Portals/9/CG-ENG/Policy",
            link_type: "official",
            title: "USCG Policy Portal",
        }],
        actions: &[],
    },
];

/// Insert the sample regulations when the store holds none.
///
/// Returns `true` if anything was inserted.
pub fn seed_if_empty<G: Gateway + ?Sized>(gateway: &mut G) -> Result<bool> {
    if !gateway.load_all_regulations()?.is_empty() {
        return Ok(false);
    }

    for seed in SEED {
        let (y, m, d) = seed.effective;
        let (ry, rm, rd, rh, rmin) = seed.received;

        let mut new = NewRegulation::new(seed.title);
        new.source = Some(seed.source.to_string());
        new.jurisdiction = Some(seed.jurisdiction.to_string());
        new.category = Some(seed.category.to_string());
        new.effective_date = NaiveDate::from_ymd_opt(y, m, d);
        new.received_at = Utc.with_ymd_and_hms(ry, rm, rd, rh, rmin, 0).single();
        new.summary = Some(seed.summary.to_string());
        new.status = seed.status;

        let regulation = gateway.insert_regulation(new)?;

        for link in seed.links {
            let mut new = NewLink::new(regulation.id, link.url);
            new.link_type = Some(link.link_type.to_string());
            new.title = Some(link.title.to_string());
            gateway.insert_link(new)?;
        }

        for action in seed.actions {
            let (y, m, d) = action.due;
            let mut new = NewAction::new(regulation.id, action.title);
            new.description = Some(action.description.to_string());
            new.status = action.status;
            new.assignee = Some(action.assignee.to_string());
            new.due_date = NaiveDate::from_ymd_opt(y, m, d);
            gateway.insert_action(new)?;
        }
    }

    info!(count = SEED.len(), "seeded sample regulations");
    Ok(true)
}
