mod annotations;
mod archives;
mod context;
mod expressions;
mod fixture;
mod javadoc;
mod members;
mod overloads;
mod reflection;
mod solvers;
