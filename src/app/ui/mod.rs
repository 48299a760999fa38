mod controls;
mod details;
mod entities;
mod fps;
mod panels;
