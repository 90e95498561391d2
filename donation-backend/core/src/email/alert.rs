use super::EmailContext;

/// Plain-text summary of a donation for team and finance staff.
#[must_use]
pub fn alert_body(context: &EmailContext<'_>) -> String {
    let donation = context.donation;
    let street = if donation.address_line2.is_empty() {
        donation.address_line1.clone()
    } else {
        format!("{}, {}", donation.address_line1, donation.address_line2)
    };

    format!(
        "A new donation was received for {team}.\n\n\
         Amount: ${amount}\n\
         Description: {description}\n\
         Name: {name}\n\
         Address: {street}, {city}, {state} {postal_code}\n\
         Email: {email}\n\
         Phone: {phone}\n",
        team = context.team,
        amount = context.amount(),
        description = donation.description,
        name = donation.name,
        city = donation.city,
        state = donation.state,
        postal_code = donation.postal_code,
        email = donation.email,
        phone = donation.phone,
    )
}
