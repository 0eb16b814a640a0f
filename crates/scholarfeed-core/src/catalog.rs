use crate::types::Publication;

fn record(title: &str, authors: &str, venue: &str, year: &str, doi: &str) -> Publication {
    Publication {
        title: title.to_string(),
        authors: authors.to_string(),
        venue: venue.to_string(),
        year: year.to_string(),
        doi: doi.to_string(),
        link: String::new(),
    }
}

/// Hand-maintained fallback list, served when no live data can be obtained.
/// Always non-empty. Update alongside the profile.
pub fn static_catalog() -> Vec<Publication> {
    vec![
        record(
            "Engineering microbiomes to enhance macroalgal health, biomass yield, and carbon sequestration",
            "Nair S, Zhang Z, Wang X, Zhang B, Jiao N, Zhang Y",
            "Green Ca. J",
            "2024",
            "10.1016/j.greenca.2024.11.001",
        ),
        record(
            "Overlooked Vital Role of Persistent Algae-Bacteria Interaction in Ocean Recalcitrant Carbon Sequestration and Its Response to Ocean Warming",
            "Zhao H, Zhang Z, Nair S, Li H, Zhao J, He C, Shi Q, Zheng Q, Cai R, Luo G, Xie S, Jiao N, Zhang Y",
            "GCB",
            "2024",
            "10.1111/gcb.17570",
        ),
        record(
            "Macroalgal virosphere assists with host–microbiome equilibrium regulation and affects prokaryotes in surrounding marine environments",
            "Zhao J, Nair S, Zhang Z, Wang Z, Jiao N, Zhang Y",
            "ISME J",
            "2024",
            "10.1093/ismejo/wrae083",
        ),
        record(
            "Adverse environmental perturbations may threaten kelp farming sustainability by exacerbating Enterobacterales diseases",
            "Zhang Y, Nair S#, Zhang Z, Zhao J, Zhao H, Lu L, Chang L, Jiao N",
            "ES&T",
            "2024",
            "10.1021/acs.est.3c09921",
        ),
        record(
            "Plastoquinone synthesis inhibition by tetrabromo biphenyldiol as a widespread algicidal mechanism of marine bacteria",
            "Zhang Z, Li D, Xie R, Guo R, Nair S, Han H, Zhang G, Zhao Q, Zhang Z, Jiao N, Zhang Y",
            "ISME J",
            "2023",
            "10.1038/s41396-023-01510-0",
        ),
        record(
            "Inherent tendency of Synechococcus and heterotrophic bacteria for mutualism on long-term coexistence despite environmental interference",
            "Nair S*, Zhang Z*, Li H, Zhao H, Shen H, Gao S, Jiao N, Zhang Y",
            "Science Advances",
            "2022",
            "10.1126/sciadv.abf4792",
        ),
        record(
            "A novel phage indirectly regulates diatom growth by infecting diatom-associated biofilm-forming bacterium",
            "Nair S, Li C, Mou S, Zhang Z, Zhang Y",
            "Applied and Environmental Microbiology",
            "2022",
            "10.1128/aem.02138-21",
        ),
        record(
            "Phage infection benefits marine diatom Phaeodactylum tricornutum by regulating the associated bacterial community",
            "Zhang Z, Zhao H, Mou S, Nair S, Zhao J, Jiao N, Zhang Y",
            "Microbial Ecology",
            "2022",
            "10.1007/s00248-022-02045-1",
        ),
        record(
            "A dark‐tolerant diatom (Chaetoceros) cultured from the deep sea",
            "Mou S, Zhang Z, Zhao H, Nair S, Li Y, Xu K, et al",
            "Journal of Phycology",
            "2022",
            "10.1111/jpy.13240",
        ),
        record(
            "Vertically exported phytoplankton (< 20 µm) and their correlation network with bacterioplankton along a deep-sea seamount",
            "Zhao H, Zhang Z, Nair S, Zhao J, Mou S, Xu K, Zhang Y",
            "Frontiers in Marine Science",
            "2022",
            "10.3389/fmars.2022.862494",
        ),
        record(
            "Long-term survival of Synechococcus and heterotrophic bacteria without external nutrient supply after changes in their relationship from antagonism to mutualism",
            "Zhang Z*, Nair S*, Tang L, Zhao H, Hu Z, Chen M, Zhang Y, Kao S-J, Jiao N, Zhang Y",
            "mBio",
            "2021",
            "10.1128/mBio.01614-21",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_nonempty_and_displayable() {
        let catalog = static_catalog();
        assert_eq!(catalog.len(), 11);
        assert!(catalog.iter().all(Publication::is_displayable));
        assert!(catalog.iter().all(|p| !p.doi.is_empty()));
    }
}
