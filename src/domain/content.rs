use crate::record_store::CosmicObject;

/// Marketing content published on the website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Features,
    PricingPlans,
    Testimonials,
    TeamMembers,
}

impl ContentKind {
    pub fn parse(kind: &str) -> Result<ContentKind, String> {
        match kind {
            "features" => Ok(ContentKind::Features),
            "pricing-plans" => Ok(ContentKind::PricingPlans),
            "testimonials" => Ok(ContentKind::Testimonials),
            "team-members" => Ok(ContentKind::TeamMembers),
            _ => Err(format!("{} is not a known content type", kind)),
        }
    }

    pub fn object_type(&self) -> &'static str {
        match self {
            ContentKind::Features => "features",
            ContentKind::PricingPlans => "pricing-plans",
            ContentKind::Testimonials => "testimonials",
            ContentKind::TeamMembers => "team-members",
        }
    }

    /// Team members are listed in the order the backend returns them.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, ContentKind::TeamMembers)
    }

    pub fn arrange(&self, mut objects: Vec<CosmicObject>) -> Vec<CosmicObject> {
        if self.is_ordered() {
            // Stable, so objects sharing an order keep the backend order
            objects.sort_by(|a, b| a.order().total_cmp(&b.order()));
        }

        objects
    }
}
