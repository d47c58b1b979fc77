use crate::{email_address::EmailAddress, macros::nutype_string};

/// A prospective customer, as submitted through the website form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub first_name: LeadFirstName,
    pub last_name: LeadLastName,
    pub company: LeadCompany,
    pub website: Option<LeadWebsite>,
    pub corporate_email: EmailAddress,
    pub phone: LeadPhone,
    pub whatsapp: LeadWhatsapp,
}

nutype_string!(LeadFirstName(len_char_max = 256));
nutype_string!(LeadLastName(len_char_max = 256));
nutype_string!(LeadCompany(len_char_max = 256));
nutype_string!(LeadWebsite(len_char_max = 2048));
nutype_string!(LeadPhone(len_char_max = 256));
nutype_string!(LeadWhatsapp(len_char_max = 256));

impl LeadWebsite {
    /// Returns `None` for a website that is empty after trimming.
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}
