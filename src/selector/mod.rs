/// Vendor prefix shared by every template identifier
pub const TEMPLATE_PREFIX: &str = "ciena";

/// Extension shared by every template identifier
pub const TEMPLATE_SUFFIX: &str = ".cfg.j2";

/// Identifier of the catch-all template
pub const GENERIC_TEMPLATE: &str = "ciena_generic.cfg.j2";

const SEPARATOR: &str = "_";

/// Build a template identifier from its attribute parts,
/// e.g. `["3916", "saos6"]` -> `ciena_3916_saos6.cfg.j2`
pub fn template_id(parts: &[&str]) -> String {
    let mut id = String::from(TEMPLATE_PREFIX);
    for part in parts {
        id.push_str(SEPARATOR);
        id.push_str(part);
    }
    id.push_str(TEMPLATE_SUFFIX);
    id
}

/// Candidate identifiers from most to least specific.
///
/// A candidate is only produced when every attribute it names is non-empty.
/// Inputs are trimmed; no other normalization is applied.
pub fn candidates(model: &str, backhaul: &str, software: &str, role: &str) -> Vec<String> {
    let model = model.trim();
    let backhaul = backhaul.trim();
    let software = software.trim();
    let role = role.trim();

    let mut out = Vec::new();
    if !model.is_empty() && !software.is_empty() && !backhaul.is_empty() {
        out.push(template_id(&[model, software, backhaul]));
    }
    if !model.is_empty() && !software.is_empty() {
        out.push(template_id(&[model, software]));
    }
    // One template per software family, shared across models
    if !software.is_empty() {
        out.push(template_id(&[software]));
    }
    if !model.is_empty() && !backhaul.is_empty() {
        out.push(template_id(&[model, backhaul]));
        out.push(template_id(&[model, backhaul, "backhaul"]));
    }
    if !model.is_empty() && !role.is_empty() {
        out.push(template_id(&[model, role]));
    }
    if !model.is_empty() {
        out.push(template_id(&[model]));
    }
    out.push(GENERIC_TEMPLATE.to_string());
    out
}

/// Pick the most specific template present in `available`.
///
/// Never fails. When no candidate matches, the first available template is
/// returned so the render step still has a real file to work with; this can
/// silently pick an unrelated template and is logged as such. With an empty
/// catalog the generic identifier is returned even though it does not exist.
pub fn select_template<S: AsRef<str>>(
    model: &str,
    backhaul: &str,
    software: &str,
    role: &str,
    available: &[S],
) -> String {
    let is_available = |name: &str| available.iter().any(|a| a.as_ref() == name);

    if let Some(found) = candidates(model, backhaul, software, role)
        .into_iter()
        .find(|c| is_available(c))
    {
        tracing::debug!("Selected template {} for model={:?} backhaul={:?} software={:?}", found, model, backhaul, software);
        return found;
    }

    match available.first() {
        Some(first) => {
            tracing::warn!(
                "No template matches model={:?} backhaul={:?} software={:?} role={:?}; falling back to first available {}",
                model,
                backhaul,
                software,
                role,
                first.as_ref()
            );
            first.as_ref().to_string()
        }
        None => GENERIC_TEMPLATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &[&str] = &[];

    #[test]
    fn test_most_specific_wins() {
        let available = ["ciena_3916_saos6_dual.cfg.j2", "ciena_generic.cfg.j2"];
        assert_eq!(
            select_template("3916", "dual", "saos6", "", &available),
            "ciena_3916_saos6_dual.cfg.j2"
        );
    }

    #[test]
    fn test_generic_when_nothing_specific() {
        let available = ["ciena_generic.cfg.j2"];
        assert_eq!(
            select_template("9999", "single", "", "", &available),
            "ciena_generic.cfg.j2"
        );
    }

    #[test]
    fn test_empty_catalog_returns_generic() {
        assert_eq!(select_template("9999", "single", "", "", EMPTY), GENERIC_TEMPLATE);
        assert_eq!(select_template("", "", "", "", EMPTY), GENERIC_TEMPLATE);
    }

    #[test]
    fn test_first_available_fallback() {
        let available = ["ciena_8114_saos10.cfg.j2", "ciena_5142.cfg.j2"];
        assert_eq!(
            select_template("3903", "single", "saos6", "", &available),
            "ciena_8114_saos10.cfg.j2"
        );
    }

    #[test]
    fn test_fallback_order() {
        let all = [
            "ciena_generic.cfg.j2",
            "ciena_3916.cfg.j2",
            "ciena_3916_edge.cfg.j2",
            "ciena_3916_dual.cfg.j2",
            "ciena_saos8.cfg.j2",
            "ciena_3916_saos8.cfg.j2",
            "ciena_3916_saos8_dual.cfg.j2",
        ];
        // Remove the winner one level at a time and check the next in line
        let expected = [
            "ciena_3916_saos8_dual.cfg.j2",
            "ciena_3916_saos8.cfg.j2",
            "ciena_saos8.cfg.j2",
            "ciena_3916_dual.cfg.j2",
            "ciena_3916_edge.cfg.j2",
            "ciena_3916.cfg.j2",
            "ciena_generic.cfg.j2",
        ];
        let mut available: Vec<&str> = all.to_vec();
        for want in expected {
            assert_eq!(select_template("3916", "dual", "saos8", "edge", &available), want);
            available.retain(|a| *a != want);
        }
    }

    #[test]
    fn test_software_family_template_serves_any_model() {
        let available = ["ciena_saos10.cfg.j2", "ciena_generic.cfg.j2"];
        assert_eq!(select_template("5171", "single", "saos10", "", &available), "ciena_saos10.cfg.j2");
        assert_eq!(select_template("8110", "dual", "saos10", "", &available), "ciena_saos10.cfg.j2");
        assert_eq!(select_template("8110", "dual", "saos6", "", &available), "ciena_generic.cfg.j2");
    }

    #[test]
    fn test_legacy_backhaul_alias() {
        let available = ["ciena_3928_dual_backhaul.cfg.j2", "ciena_3928.cfg.j2"];
        assert_eq!(
            select_template("3928", "dual", "", "", &available),
            "ciena_3928_dual_backhaul.cfg.j2"
        );
    }

    #[test]
    fn test_inputs_are_trimmed_but_case_sensitive() {
        let available = ["ciena_3916_saos6.cfg.j2", "ciena_generic.cfg.j2"];
        assert_eq!(select_template(" 3916 ", "", " saos6\n", "", &available), "ciena_3916_saos6.cfg.j2");
        assert_eq!(select_template("3916", "", "SAOS6", "", &available), "ciena_generic.cfg.j2");
    }

    #[test]
    fn test_candidates_skip_missing_attributes() {
        assert_eq!(
            candidates("3916", "", "", ""),
            vec!["ciena_3916.cfg.j2", "ciena_generic.cfg.j2"]
        );
        assert_eq!(candidates("", "single", "", "edge"), vec!["ciena_generic.cfg.j2"]);
        assert_eq!(candidates("3916", "single", "saos6", "edge").len(), 8);
    }

    #[test]
    fn test_template_id() {
        assert_eq!(template_id(&["3916", "saos6", "dual"]), "ciena_3916_saos6_dual.cfg.j2");
        assert_eq!(template_id(&["generic"]), GENERIC_TEMPLATE);
    }
}
