mod assets;
mod emails;
mod engagement;
mod leads;
mod reports;
