use owl_models::{
    email_address::EmailAddress,
    lead::{
        LeadCompany, LeadFirstName, LeadLastName, LeadPhone, LeadSubmission, LeadWebsite,
        LeadWhatsapp,
    },
};
use serde::{de, Deserialize, Deserializer};

/// Fields of the lead form on the landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiLeadForm {
    /// First name
    #[serde(deserialize_with = "required")]
    pub nombre: LeadFirstName,
    /// Last name
    #[serde(deserialize_with = "required")]
    pub apellido: LeadLastName,
    /// Company name
    #[serde(deserialize_with = "required")]
    pub empresa: LeadCompany,
    /// Company website, may be left empty
    #[serde(default)]
    pub web: LeadWebsite,
    /// Corporate email address
    pub correo: EmailAddress,
    /// Phone number
    #[serde(deserialize_with = "required")]
    pub telefono: LeadPhone,
    /// WhatsApp number
    #[serde(deserialize_with = "required")]
    pub whatsapp: LeadWhatsapp,
}

impl From<ApiLeadForm> for LeadSubmission {
    fn from(value: ApiLeadForm) -> Self {
        Self {
            first_name: value.nombre,
            last_name: value.apellido,
            company: value.empresa,
            website: value.web.non_empty(),
            corporate_email: value.correo,
            phone: value.telefono,
            whatsapp: value.whatsapp,
        }
    }
}

/// Deserializes a required field, treating an empty value like a missing
/// one. Whitespace-only values pass and end up empty after trimming.
fn required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<String>,
    T::Error: std::fmt::Display,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(de::Error::custom("field required"));
    }
    T::try_from(value).map_err(de::Error::custom)
}
