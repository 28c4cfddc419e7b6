// Patient profile endpoints: own profile and the assigned clinician's
// contact card.

pub mod handlers;
