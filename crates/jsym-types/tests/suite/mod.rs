mod assignability;
mod fixture;
mod solver;
mod substitution;
